//! Fetches the observation page and, when one is linked, its CSV export.

use std::time::Duration;

use anyhow::{bail, Context, Result};
use reqwest::{Client, Response, Url};
use scraper::{Html, Selector};

/// Builds the shared HTTP client: identifying user agent, hard timeout.
pub fn build_client(user_agent: &str, timeout: Duration) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(timeout)
        .build()
        .context("building the HTTP client")
}

/// Downloads the observation page as text.
pub async fn fetch_page(client: &Client, url: &str) -> Result<String> {
    get_checked(client, url)
        .await?
        .text()
        .await
        .context("reading the page body")
}

/// Downloads a linked export, tolerating the provider's legacy encoding.
pub async fn fetch_export(client: &Client, url: &str) -> Result<String> {
    let body = get_checked(client, url)
        .await?
        .bytes()
        .await
        .context("reading the export body")?;
    Ok(decode_text(&body))
}

async fn get_checked(client: &Client, url: &str) -> Result<Response> {
    let response = client
        .get(url)
        .send()
        .await
        .with_context(|| format!("requesting {url}"))?;
    if !response.status().is_success() {
        bail!("{url} answered {}", response.status());
    }
    Ok(response)
}

/// First anchor on the page that points at a CSV export, if any.
pub fn find_export_href(document: &str) -> Option<String> {
    let html = Html::parse_document(document);
    let anchors = Selector::parse("a[href]").unwrap();
    html.select(&anchors)
        .filter_map(|anchor| anchor.value().attr("href"))
        .find(|href| is_csv_href(href))
        .map(str::to_string)
}

fn is_csv_href(href: &str) -> bool {
    let path = href.split('?').next().unwrap_or(href);
    path.to_ascii_lowercase().ends_with(".csv")
}

/// Resolves an export link against the page it came from.
pub fn resolve_href(page_url: &str, href: &str) -> Result<String> {
    let page = Url::parse(page_url).with_context(|| format!("parsing {page_url}"))?;
    let resolved = page
        .join(href)
        .with_context(|| format!("resolving {href} against {page_url}"))?;
    Ok(resolved.to_string())
}

/// Decodes export bytes: UTF-8 first, Latin-1 for legacy exports.
pub fn decode_text(body: &[u8]) -> String {
    match std::str::from_utf8(body) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        // Latin-1 maps each byte to the code point of the same value
        Err(_) => body.iter().map(|&byte| byte as char).collect(),
    }
}

// -- Tests -------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_spot_an_export_link() {
        let document = r#"
            <body>
              <a href="/informacion">Información</a>
              <a href="/datos/9091R_ultimos.CSV?k=pva">Descargar datos</a>
            </body>"#;

        assert_eq!(
            find_export_href(document),
            Some("/datos/9091R_ultimos.CSV?k=pva".to_string())
        );
    }

    #[test]
    fn should_ignore_links_that_are_not_exports() {
        let document = r##"
            <body>
              <a href="/datos.pdf">PDF</a>
              <a href="/datos.csvx">Otro</a>
              <a href="#tabla">Ancla</a>
            </body>"##;

        assert_eq!(find_export_href(document), None);
    }

    #[test]
    fn should_resolve_relative_export_links() {
        let page = "https://www.aemet.es/es/eltiempo/observacion/ultimosdatos?k=pva&l=9091R";

        assert_eq!(
            resolve_href(page, "/datos/9091R.csv").unwrap(),
            "https://www.aemet.es/datos/9091R.csv"
        );
        assert_eq!(
            resolve_href(page, "9091R.csv").unwrap(),
            "https://www.aemet.es/es/eltiempo/observacion/9091R.csv"
        );
        assert_eq!(
            resolve_href(page, "https://otro.example/d.csv").unwrap(),
            "https://otro.example/d.csv"
        );
    }

    #[test]
    fn should_decode_utf8_exports() {
        let body = "Fecha;Temperatura (ºC)\n".as_bytes();

        assert_eq!(decode_text(body), "Fecha;Temperatura (ºC)\n");
    }

    #[test]
    fn should_strip_a_byte_order_mark() {
        let body = "\u{feff}Fecha;Temperatura\n".as_bytes();

        assert_eq!(decode_text(body), "Fecha;Temperatura\n");
    }

    #[test]
    fn should_fall_back_to_latin1() {
        let body = b"Temperatura (\xbaC);12,3\n";

        assert_eq!(decode_text(body), "Temperatura (ºC);12,3\n");
    }
}
