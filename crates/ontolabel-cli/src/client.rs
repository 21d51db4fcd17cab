//! Async HTTP client for the EBI Ontology Lookup Service (OLS v4).

use anyhow::{Context as _, Result};
use ontolabel_core::{Curie, LookupError, client::OntologyClient};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://www.ebi.ac.uk/ols4/api";

/// Resolves labels through the OLS `terms` endpoint.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct OlsClient {
  client:   Client,
  base_url: String,
}

#[derive(Deserialize)]
struct TermsResponse {
  #[serde(rename = "_embedded")]
  embedded: Option<Embedded>,
}

#[derive(Deserialize)]
struct Embedded {
  terms: Vec<Term>,
}

#[derive(Deserialize)]
struct Term {
  label: String,
}

impl OlsClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .user_agent(concat!("ontolabel/", env!("CARGO_PKG_VERSION")))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self {
      client,
      base_url: base_url.into(),
    })
  }

  fn url(&self) -> String {
    format!("{}/terms", self.base_url.trim_end_matches('/'))
  }

  fn unavailable(curie: &Curie, detail: impl std::fmt::Display) -> LookupError {
    LookupError::Unavailable {
      message: format!("OLS query for {curie} failed: {detail}"),
    }
  }
}

impl OntologyClient for OlsClient {
  /// `GET /api/terms?obo_id=<curie>`
  async fn lookup(&self, curie: &Curie) -> Result<String, LookupError> {
    let resp = self
      .client
      .get(self.url())
      .query(&[("obo_id", curie.as_str())])
      .send()
      .await
      .map_err(|err| Self::unavailable(curie, err))?;

    if resp.status() == StatusCode::NOT_FOUND {
      return Err(LookupError::NotFound {
        curie: curie.as_str().to_owned(),
      });
    }
    let resp = resp
      .error_for_status()
      .map_err(|err| Self::unavailable(curie, err))?;

    let body: TermsResponse = resp
      .json()
      .await
      .map_err(|err| Self::unavailable(curie, err))?;

    let mut terms = body.embedded.map(|e| e.terms).unwrap_or_default();
    match terms.len() {
      0 => Err(LookupError::NotFound {
        curie: curie.as_str().to_owned(),
      }),
      1 => Ok(terms.remove(0).label),
      _ => {
        // OLS returns one entry per ontology that declares the term.
        // Agreeing labels are fine; disagreeing ones are ambiguous.
        let first = terms.remove(0).label;
        if terms.iter().all(|t| t.label == first) {
          Ok(first)
        } else {
          Err(LookupError::Ambiguous {
            curie: curie.as_str().to_owned(),
          })
        }
      }
    }
  }
}
