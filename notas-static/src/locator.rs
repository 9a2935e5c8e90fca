//! Descriptor locators
//!
//! A locator is the string a front end uses to fetch a listed document
//! again. It is always derived from the file name alone.

use notas_core::config::{LocatorStyle, NotasConfig};
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use url::form_urlencoded;

/// Characters escaped when a name becomes a single path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// How descriptor paths are built
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Direct URL under the prefix the directory is exposed at
    Static { prefix: String },
    /// Query against the file endpoint.
    ///
    /// The name is form-urlencoded, so a space becomes `+` rather than
    /// `%20`; the file endpoint accepts both.
    Query { endpoint: String, param: String },
}

impl Locator {
    /// Build the locator the configuration asks for
    pub fn from_config(config: &NotasConfig) -> Self {
        match config.library.locator {
            LocatorStyle::Static => Locator::Static {
                prefix: config.library.static_prefix.clone(),
            },
            LocatorStyle::Query => Locator::Query {
                endpoint: config.server.file_path.clone(),
                param: config.server.file_param.clone(),
            },
        }
    }

    /// Locator for the file called `name`
    pub fn locate(&self, name: &str) -> String {
        match self {
            Locator::Static { prefix } => format!(
                "{}/{}",
                prefix.trim_end_matches('/'),
                utf8_percent_encode(name, PATH_SEGMENT)
            ),
            Locator::Query { endpoint, param } => {
                let query = form_urlencoded::Serializer::new(String::new())
                    .append_pair(param, name)
                    .finish();
                format!("{}?{}", endpoint, query)
            }
        }
    }
}
