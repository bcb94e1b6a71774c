//! Filename patterns for license and README files, and fingerprints that tell
//! a full license text apart from a one-line pointer to one.

use once_cell::sync::Lazy;
use regex::Regex;

/// License file basenames, in priority order.
const LICENSE_FILES: &[&str] = &[
    r"(?i)^LICENSE$",                                      // LICENSE
    r"(?i)^LICENSE\.[0-9A-Za-z_]+$",                       // LICENSE.md
    r"(?i)^LICENSE-[0-9A-Za-z_]+$",                        // LICENSE-MIT
    r"(?i)^LICENSE-[0-9A-Za-z_]+\.[0-9A-Za-z_]+$",         // LICENSE-MIT.md
    r"(?i)^UNLICENSE$",                                    // UNLICENSE
    r"(?i)^LICENCE$",                                      // LICENCE
    r"(?i)^LICENCE-[0-9A-Za-z_]+$",                        // LICENCE-MIT
    r"(?i)^LICENCE-[0-9A-Za-z_]+\.[0-9A-Za-z_]+$",         // LICENCE-MIT.md
    r"(?i)^LICENCE\.[0-9A-Za-z_]+$",                       // LICENCE.md
    r"(?i)^UNLICENCE$",                                    // UNLICENCE
    r"(?i)^COPYING$",
];

const README_FILES: &[&str] = &[r"(?i)^readme$", r"(?i)^readme\.[0-9A-Za-z_]+$"];

/// Distinguishing passages of license families whose full text commonly
/// appears inline in a README.
const FULL_TEXT_FINGERPRINTS: &[(&str, &str)] = &[
    ("MIT", r"ermission is hereby granted, free of charge, to any"),
    (
        "BSD",
        r"edistribution and use in source and binary forms, with or withou",
    ),
    (
        "BSD-source-code",
        r"edistribution and use of this software in source and binary forms, with or withou",
    ),
    (
        "CC0-1.0",
        r"(?i)The\s+person\s+who\s+associated\s+a\s+work\s+with\s+this\s+deed\s+has\s+dedicated\s+the\s+work\s+to\s+the\s+public\s+domain\s+by\s+waiving\s+all\s+of\s+his\s+or\s+her\s+rights\s+to\s+the\s+work\s+worldwide\s+under\s+copyright\s+law,\s+including\s+all\s+related\s+and\s+neighboring\s+rights,\s+to\s+the\s+extent\s+allowed\s+by\s+law.\s+You\s+can\s+copy,\s+modify,\s+distribute\s+and\s+perform\s+the\s+work,\s+even\s+for\s+commercial\s+purposes,\s+all\s+without\s+asking\s+permission.",
    ),
];

static COMPILED: Lazy<Result<LicensePatterns, regex::Error>> = Lazy::new(LicensePatterns::compile);

/// Compiled filename patterns and full-text fingerprints.
#[derive(Debug)]
pub struct LicensePatterns {
    license_files: Vec<Regex>,
    readme_files: Vec<Regex>,
    fingerprints: Vec<(&'static str, Regex)>,
}

impl LicensePatterns {
    pub fn compile() -> Result<Self, regex::Error> {
        let license_files = LICENSE_FILES
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<_, _>>()?;
        let readme_files = README_FILES
            .iter()
            .map(|p| Regex::new(p))
            .collect::<Result<_, _>>()?;

        let mut fingerprints = Vec::with_capacity(FULL_TEXT_FINGERPRINTS.len());
        for (family, pattern) in FULL_TEXT_FINGERPRINTS {
            fingerprints.push((*family, Regex::new(pattern)?));
        }

        Ok(Self {
            license_files,
            readme_files,
            fingerprints,
        })
    }

    /// Process-wide instance, compiled on first use.
    pub fn shared() -> Result<&'static Self, regex::Error> {
        COMPILED.as_ref().map_err(Clone::clone)
    }

    pub fn license_file<'a>(&self, files: &'a [String]) -> Option<&'a str> {
        first_match(&self.license_files, files)
    }

    pub fn readme_file<'a>(&self, files: &'a [String]) -> Option<&'a str> {
        first_match(&self.readme_files, files)
    }

    /// Name of the license family whose full text `text` contains, if any.
    pub fn full_text_family(&self, text: &str) -> Option<&'static str> {
        self.fingerprints
            .iter()
            .find(|(_, re)| re.is_match(text))
            .map(|(family, _)| *family)
    }
}

/// First file name that matches, checking patterns in priority order and
/// falling back to listing order among files matching the same pattern.
fn first_match<'a>(patterns: &[Regex], files: &'a [String]) -> Option<&'a str> {
    patterns
        .iter()
        .find_map(|re| files.iter().find(|f| re.is_match(f)))
        .map(String::as_str)
}
