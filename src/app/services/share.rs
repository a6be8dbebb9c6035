use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use url::Url;

use crate::app::domain::document::Document;
use crate::app::domain::language;
use crate::app::infrastructure::error::Result;

const CODE_PARAM: &str = "code";
const LANG_PARAM: &str = "lang";

/// Characters left bare in a query component: ASCII alphanumerics and
/// `-_.!~*'()`, the same set browsers leave alone in `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Build a link that carries the document in its `code` and `lang` query pair.
///
/// Values are percent-encoded (a space is `%20`, never `+`); any query the
/// base already has is replaced.
pub fn share_url(base: &str, document: &Document) -> Result<Url> {
    let mut url = Url::parse(base)?;
    let query = format!(
        "{}={}&{}={}",
        CODE_PARAM,
        utf8_percent_encode(&document.text, COMPONENT),
        LANG_PARAM,
        utf8_percent_encode(&document.language, COMPONENT),
    );
    url.set_query(Some(&query));
    Ok(url)
}

/// Restore a document from a share link.
///
/// Returns `None` when the link carries no `code`. A missing `lang` falls
/// back to the default language.
pub fn document_from_share_url(link: &str) -> Result<Option<Document>> {
    let url = Url::parse(link)?;
    let mut code = None;
    let mut lang = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            CODE_PARAM => code = Some(value.into_owned()),
            LANG_PARAM => lang = Some(value.into_owned()),
            _ => {}
        }
    }

    Ok(code.map(|text| {
        let language = lang
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| language::DEFAULT_LANGUAGE.to_string());
        Document::new(text, language)
    }))
}
