//! Static subject catalogs for every supported exam type.
//!
//! Each exam type selects an ordered, immutable list of subjects and the
//! field-name prefix under which a record stores its per-subject counts.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// A subject within one exam sitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Subject {
    /// Stable key used in record field names (e.g. "matematik").
    pub id: &'static str,
    /// Display label.
    pub name: &'static str,
    /// Number of questions asked for this subject.
    pub max_questions: u32,
}

const fn subject(id: &'static str, name: &'static str, max_questions: u32) -> Subject {
    Subject {
        id,
        name,
        max_questions,
    }
}

pub const TYT_SUBJECTS: &[Subject] = &[
    subject("turkce", "Türkçe", 40),
    subject("matematik", "Matematik", 40),
    subject("fen", "Fen Bilimleri", 20),
    subject("sosyal", "Sosyal Bilimler", 20),
];

/// The combined AYT catalog used by records created before the track split.
pub const AYT_SUBJECTS: &[Subject] = &[
    subject("matematik", "Matematik", 40),
    subject("fizik", "Fizik", 14),
    subject("kimya", "Kimya", 13),
    subject("biyoloji", "Biyoloji", 13),
    subject("edebiyat", "Edebiyat", 24),
    subject("tarih1", "Tarih-1", 10),
    subject("cografya1", "Coğrafya-1", 6),
    subject("tarih2", "Tarih-2", 11),
    subject("cografya2", "Coğrafya-2", 11),
    subject("felsefe", "Felsefe Grubu", 12),
    subject("din", "Din Kültürü", 6),
];

pub const AYT_SAYISAL_SUBJECTS: &[Subject] = &[
    subject("matematik", "Matematik", 40),
    subject("fizik", "Fizik", 14),
    subject("kimya", "Kimya", 13),
    subject("biyoloji", "Biyoloji", 13),
];

pub const AYT_ESIT_SUBJECTS: &[Subject] = &[
    subject("matematik", "Matematik", 40),
    subject("edebiyat", "Edebiyat", 24),
    subject("tarih1", "Tarih-1", 10),
    subject("cografya1", "Coğrafya-1", 6),
];

pub const AYT_SOZEL_SUBJECTS: &[Subject] = &[
    subject("edebiyat", "Edebiyat", 24),
    subject("tarih1", "Tarih-1", 10),
    subject("cografya1", "Coğrafya-1", 6),
    subject("tarih2", "Tarih-2", 11),
    subject("cografya2", "Coğrafya-2", 11),
    subject("felsefe", "Felsefe Grubu", 12),
    subject("din", "Din Kültürü", 6),
];

/// Which subject catalog applies to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExamType {
    #[serde(rename = "TYT")]
    Tyt,
    #[serde(rename = "AYT")]
    Ayt,
    #[serde(rename = "AYT_SAYISAL")]
    AytSayisal,
    #[serde(rename = "AYT_ESIT")]
    AytEsit,
    #[serde(rename = "AYT_SOZEL")]
    AytSozel,
}

impl ExamType {
    /// Every registered exam type, in display order.
    pub const ALL: [ExamType; 5] = [
        ExamType::Tyt,
        ExamType::Ayt,
        ExamType::AytSayisal,
        ExamType::AytEsit,
        ExamType::AytSozel,
    ];

    /// Canonical tag as stored on records.
    pub fn tag(self) -> &'static str {
        match self {
            ExamType::Tyt => "TYT",
            ExamType::Ayt => "AYT",
            ExamType::AytSayisal => "AYT_SAYISAL",
            ExamType::AytEsit => "AYT_ESIT",
            ExamType::AytSozel => "AYT_SOZEL",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            ExamType::Tyt => "TYT",
            ExamType::Ayt => "AYT",
            ExamType::AytSayisal => "AYT (Sayısal)",
            ExamType::AytEsit => "AYT (Eşit Ağırlık)",
            ExamType::AytSozel => "AYT (Sözel)",
        }
    }

    /// Ordered subjects for this exam type.
    pub fn subjects(self) -> &'static [Subject] {
        match self {
            ExamType::Tyt => TYT_SUBJECTS,
            ExamType::Ayt => AYT_SUBJECTS,
            ExamType::AytSayisal => AYT_SAYISAL_SUBJECTS,
            ExamType::AytEsit => AYT_ESIT_SUBJECTS,
            ExamType::AytSozel => AYT_SOZEL_SUBJECTS,
        }
    }

    /// Prefix namespacing the per-subject fields of a record.
    pub fn prefix(self) -> &'static str {
        match self {
            ExamType::Tyt => "tyt_",
            _ => "ayt_",
        }
    }

    pub fn family(self) -> ExamFamily {
        match self {
            ExamType::Tyt => ExamFamily::Tyt,
            _ => ExamFamily::Ayt,
        }
    }

    /// Look up a subject of this catalog by id.
    pub fn subject(self, id: &str) -> Option<&'static Subject> {
        self.subjects().iter().find(|s| s.id == id)
    }

    /// Highest reachable total net (every question answered correctly).
    pub fn max_total_net(self) -> u32 {
        self.subjects().iter().map(|s| s.max_questions).sum()
    }
}

impl fmt::Display for ExamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ExamType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_uppercase().replace('-', "_");
        ExamType::ALL
            .into_iter()
            .find(|t| t.tag() == normalized)
            .ok_or_else(|| CatalogError::UnknownExamType(s.to_string()))
    }
}

/// Groups of exam types shown together in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExamFamily {
    Tyt,
    Ayt,
}

impl ExamFamily {
    /// Exam types belonging to this family.
    pub fn members(self) -> Vec<ExamType> {
        ExamType::ALL
            .into_iter()
            .filter(|t| t.family() == self)
            .collect()
    }

    /// Whether a raw record tag belongs to this family.
    pub fn contains_tag(self, tag: &str) -> bool {
        tag.parse::<ExamType>()
            .map(|t| t.family() == self)
            .unwrap_or(false)
    }
}

impl FromStr for ExamFamily {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "TYT" => Ok(ExamFamily::Tyt),
            "AYT" => Ok(ExamFamily::Ayt),
            _ => Err(CatalogError::UnknownExamType(s.to_string())),
        }
    }
}

/// Ordered subjects for an exam-type tag.
pub fn subjects_for(exam_type: &str) -> Result<&'static [Subject], CatalogError> {
    exam_type.parse::<ExamType>().map(ExamType::subjects)
}

/// Field-name prefix for an exam-type tag.
pub fn prefix_for(exam_type: &str) -> Result<&'static str, CatalogError> {
    exam_type.parse::<ExamType>().map(ExamType::prefix)
}
