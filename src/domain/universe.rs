//! Screening universe: an ordered list of instruments.
//!
//! Order matters: it is the tie-break order of the final report.

use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instrument {
    pub name: String,
    pub code: String,
}

impl Instrument {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Universe {
    pub instruments: Vec<Instrument>,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.instruments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instruments.is_empty()
    }

    /// Twenty large SGX-listed names.
    pub fn sgx_default() -> Self {
        const SGX: [(&str, &str); 20] = [
            ("DBS Group Holdings", "D05.SI"),
            ("OCBC Bank", "O39.SI"),
            ("United Overseas Bank", "U11.SI"),
            ("Singapore Airlines", "C6L.SI"),
            ("Singtel", "Z74.SI"),
            ("CapitaLand Investment", "9CI.SI"),
            ("Wilmar International", "F34.SI"),
            ("Genting Singapore", "G13.SI"),
            ("City Developments", "C09.SI"),
            ("Keppel Corp", "BN4.SI"),
            ("ComfortDelGro", "C52.SI"),
            ("SembCorp Industries", "U96.SI"),
            ("Thai Beverage", "Y92.SI"),
            ("Jardine Matheson", "J36.SI"),
            ("Hongkong Land", "H78.SI"),
            ("ST Engineering", "S63.SI"),
            ("Ascendas REIT", "A17U.SI"),
            ("CapitaLand Mall Trust", "C38U.SI"),
            ("Mapletree Logistics Trust", "M44U.SI"),
            ("Venture Corp", "V03.SI"),
        ];
        Self {
            instruments: SGX
                .iter()
                .map(|(name, code)| Instrument::new(*name, *code))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in instrument list")]
    EmptyToken,

    #[error("missing code in entry: {0}")]
    MissingCode(String),

    #[error("duplicate code: {0}")]
    DuplicateCode(String),
}

/// Parse `Name:CODE, Name:CODE, ...`. A bare `CODE` uses the code as its name.
pub fn parse_universe(input: &str) -> Result<Universe, UniverseError> {
    let mut instruments = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }

        let (name, code) = match trimmed.rsplit_once(':') {
            Some((name, code)) => (name.trim(), code.trim()),
            None => (trimmed, trimmed),
        };
        if code.is_empty() {
            return Err(UniverseError::MissingCode(trimmed.to_string()));
        }

        let code = code.to_uppercase();
        let name = if name.is_empty() { code.as_str() } else { name };
        if !seen.insert(code.clone()) {
            return Err(UniverseError::DuplicateCode(code));
        }
        instruments.push(Instrument::new(name, code.clone()));
    }

    Ok(Universe { instruments })
}
