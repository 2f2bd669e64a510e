//! Pattern groups: named, ordered sets of case-insensitive regular expressions.
//!
//! The default tables below are the shipped configuration. They are copied
//! into [`RelevanceConfig`](crate::RelevanceConfig) and can be replaced from a
//! TOML file; nothing in the pipeline reads them directly.

use regex::{Regex, RegexBuilder};

use crate::config::ConfigError;

/// Government bodies and programmes that take equity positions.
pub const GOVERNMENT_ENTITIES: &[&str] = &[
    r"\bU\.S\. Government\b",
    r"\bUnited States Government\b",
    r"\bDepartment of Commerce\b",
    r"\bDepartment of Defense\b",
    r"\bDOD\b",
    r"\bDOC\b",
    r"\bTreasury Department\b",
    r"\bU\.S\. Treasury\b",
    r"\bNational Security\b",
    r"\bCHIPS and Science Act\b",
    r"\bCHIPS Act\b",
    r"\bDefense Production Act\b",
    r"\bCommittee on Foreign Investment\b",
    r"\bCFIUS\b",
];

/// Equity and transaction-document vocabulary.
pub const INVESTMENT_TERMS: &[&str] = &[
    r"\bequity investment\b",
    r"\bequity stake\b",
    r"\bequity position\b",
    r"\bpreferred shares\b",
    r"\bpreferred stock investment\b",
    r"\bstock purchase\b",
    r"\bwarrant agreement\b",
    r"\bwarrant issuance\b",
    r"\bconvertible preferred\b",
    r"\bseries [A-Z] preferred\b",
    r"\binvestment agreement\b",
    r"\bpurchase agreement\b",
    r"\bfunding agreement\b",
    r"\bcapital investment\b",
];

/// Signals of a concrete deal rather than a discussion of one.
pub const TRANSACTION_INDICATORS: &[&str] = &[
    r"\$[\d,]+\s*(million|billion)\s*(investment|funding|purchase)",
    r"(received|obtained|secured)\s+\$[\d,]+",
    r"(closing|completion)\s+of.*investment",
    r"(entered into|executed|signed).*agreement",
    r"(purchase|issuance)\s+of.*shares",
    r"(funding|investment).*of\s+\$[\d,]+",
    r"(total|aggregate)\s+(funding|investment)",
    r"(first|initial|additional)\s+tranche",
];

/// Boilerplate, hypothetical, and debt/credit contexts.
pub const FALSE_POSITIVE_EXCLUSIONS: &[&str] = &[
    r"risk.*factors?",
    r"material.*weakness",
    r"legal.*proceedings?",
    r"forward.*looking.*statements?",
    r"hypothetical",
    r"example",
    r"illustration",
    r"may.*be.*subject.*to",
    r"could.*be.*impacted.*by",
    r"potential.*future",
    r"general.*economic.*conditions",
    r"regulatory.*environment",
    r"bond.*market",
    r"debt.*securities",
    r"credit.*facility",
];

/// Form 8-K items 1.01 (material definitive agreement) and 3.02
/// (unregistered sale of equity securities).
pub const ITEM_MARKER: &str = r"item\s+(1\.01|3\.02)";

/// Semantic category of a pattern group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Government,
    Investment,
    Transaction,
    Exclusion,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Government => "government",
            Self::Investment => "investment",
            Self::Transaction => "transaction",
            Self::Exclusion => "exclusion",
        }
    }
}

/// A single compiled member of a group, keeping its source for labels.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    regex: Regex,
}

impl CompiledPattern {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text)
    }
}

/// An immutable, ordered set of compiled patterns for one [`Category`].
///
/// Order does not affect which matches exist, but it does fix the order in
/// which matches are reported, and therefore the proximity tie-break.
#[derive(Debug, Clone)]
pub struct PatternGroup {
    category: Category,
    patterns: Vec<CompiledPattern>,
}

impl PatternGroup {
    /// Compile every source case-insensitively, failing on the first bad one.
    pub fn compile<S: AsRef<str>>(category: Category, sources: &[S]) -> Result<Self, ConfigError> {
        let patterns = sources
            .iter()
            .map(|s| {
                let source = s.as_ref();
                compile_pattern(source)
                    .map(|regex| CompiledPattern {
                        source: source.to_string(),
                        regex,
                    })
                    .map_err(|e| ConfigError::Pattern {
                        group: category.as_str(),
                        pattern: source.to_string(),
                        source: e,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { category, patterns })
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompiledPattern> {
        self.patterns.iter()
    }

    /// Number of distinct members with at least one match in `text`.
    pub fn count_present(&self, text: &str) -> usize {
        self.patterns.iter().filter(|p| p.is_match(text)).count()
    }

    /// Members with at least one match in `text`, in group order.
    pub fn present_in<'a>(&'a self, text: &str) -> Vec<&'a CompiledPattern> {
        self.patterns.iter().filter(|p| p.is_match(text)).collect()
    }
}

pub(crate) fn compile_pattern(source: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(source).case_insensitive(true).build()
}
