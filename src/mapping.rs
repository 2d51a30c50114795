//! Normalization tables for free-text form input.
//!
//! Submitter and vendor-selection values arrive as free text and are folded
//! into fixed code sets by ordered substring matching: the input is trimmed
//! and lower-cased, the tables are scanned top to bottom, and the first
//! phrase contained in the input wins. No match falls back to the table's
//! default code.

use chrono::NaiveDate;

/// Department codes a work order can be submitted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum SubmittedBy {
    #[strum(serialize = "IT_Dept")]
    ItDept,
    #[strum(serialize = "Maresanm")]
    Maresanm,
    #[strum(serialize = "Ops_Support")]
    OpsSupport,
    #[strum(serialize = "Ops_Technical")]
    OpsTechnical,
    #[strum(serialize = "Executive_Office")]
    ExecutiveOffice,
    #[strum(serialize = "Fin_Acc")]
    FinAcc,
}

impl SubmittedBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ItDept => "IT_Dept",
            Self::Maresanm => "Maresanm",
            Self::OpsSupport => "Ops_Support",
            Self::OpsTechnical => "Ops_Technical",
            Self::ExecutiveOffice => "Executive_Office",
            Self::FinAcc => "Fin_Acc",
        }
    }
}

/// How the vendor for a work order is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum VendorSelectionMethod {
    #[strum(serialize = "tender_process")]
    TenderProcess,
    #[strum(serialize = "sole_source_vendor")]
    SoleSourceVendor,
}

impl VendorSelectionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TenderProcess => "tender_process",
            Self::SoleSourceVendor => "sole_source_vendor",
        }
    }
}

/// Ordered phrase table for submitter normalization. First match wins.
const SUBMITTED_BY_TABLE: &[(&str, SubmittedBy)] = &[
    ("it dept", SubmittedBy::ItDept),
    ("it dept.", SubmittedBy::ItDept),
    ("it department", SubmittedBy::ItDept),
    ("it", SubmittedBy::ItDept),
    ("maresanm", SubmittedBy::Maresanm),
    ("ops support", SubmittedBy::OpsSupport),
    ("ops_support", SubmittedBy::OpsSupport),
    ("ops-support", SubmittedBy::OpsSupport),
    ("ops technical", SubmittedBy::OpsTechnical),
    ("ops_technical", SubmittedBy::OpsTechnical),
    ("ops-technical", SubmittedBy::OpsTechnical),
    ("executive office", SubmittedBy::ExecutiveOffice),
    ("executive_office", SubmittedBy::ExecutiveOffice),
    ("executive-office", SubmittedBy::ExecutiveOffice),
    ("fin acc", SubmittedBy::FinAcc),
    ("fin_acc", SubmittedBy::FinAcc),
    ("fin-acc", SubmittedBy::FinAcc),
    ("finance & accounting", SubmittedBy::FinAcc),
    ("accounting", SubmittedBy::FinAcc),
    ("finance", SubmittedBy::FinAcc),
];

const DEFAULT_SUBMITTED_BY: SubmittedBy = SubmittedBy::ItDept;

/// Ordered phrase table for vendor-selection-method normalization.
const VENDOR_SELECTION_TABLE: &[(&str, VendorSelectionMethod)] = &[
    ("tender process", VendorSelectionMethod::TenderProcess),
    ("tender", VendorSelectionMethod::TenderProcess),
    ("tender_process", VendorSelectionMethod::TenderProcess),
    ("tender-process", VendorSelectionMethod::TenderProcess),
    ("sole source vendor", VendorSelectionMethod::SoleSourceVendor),
    ("sole source", VendorSelectionMethod::SoleSourceVendor),
    ("sole_source_vendor", VendorSelectionMethod::SoleSourceVendor),
    ("sole-source-vendor", VendorSelectionMethod::SoleSourceVendor),
    ("sole", VendorSelectionMethod::SoleSourceVendor),
];

const DEFAULT_VENDOR_SELECTION: VendorSelectionMethod = VendorSelectionMethod::SoleSourceVendor;

/// Form attachment field names mapped to stored document-type tags.
/// Unknown field names pass through unchanged as the tag.
const ATTACHMENT_TAG_TABLE: &[(&str, &str)] = &[
    ("layout", "layout"),
    ("documentation", "documentation"),
    ("photoImages", "photo_images"),
    ("billOfQuantity", "bill_of_quantity"),
];

/// Textual date formats accepted by the form, tried in order.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", // 2025-12-30
    "%d %b %Y", // 30 Dec 2025
    "%d/%m/%Y", // 30/12/2025
    "%m/%d/%Y", // 12/30/2025
    "%Y/%m/%d", // 2025/12/30
];

pub fn map_submitted_by(input: &str) -> SubmittedBy {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return DEFAULT_SUBMITTED_BY;
    }
    SUBMITTED_BY_TABLE
        .iter()
        .find(|(phrase, _)| needle.contains(phrase))
        .map(|(_, code)| *code)
        .unwrap_or(DEFAULT_SUBMITTED_BY)
}

pub fn map_vendor_selection_method(input: &str) -> VendorSelectionMethod {
    let needle = input.trim().to_lowercase();
    if needle.is_empty() {
        return DEFAULT_VENDOR_SELECTION;
    }
    VENDOR_SELECTION_TABLE
        .iter()
        .find(|(phrase, _)| needle.contains(phrase))
        .map(|(_, code)| *code)
        .unwrap_or(DEFAULT_VENDOR_SELECTION)
}

pub fn attachment_tag(field_name: &str) -> &str {
    ATTACHMENT_TAG_TABLE
        .iter()
        .find(|(field, _)| *field == field_name)
        .map(|(_, tag)| *tag)
        .unwrap_or(field_name)
}

/// Parses a form date, trying each accepted format in order. Returns `None`
/// when no format matches so the caller decides the fallback.
pub fn parse_form_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(trimmed, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepted_date_formats_parse_in_order() {
        let expected = NaiveDate::from_ymd_opt(2025, 12, 30).unwrap();
        for input in [
            "2025-12-30",
            "30 Dec 2025",
            "30/12/2025",
            "12/30/2025",
            "2025/12/30",
        ] {
            assert_eq!(parse_form_date(input), Some(expected), "input {input:?}");
        }
    }

    #[test]
    fn ambiguous_slash_date_resolves_day_first() {
        // 05/04/2025 matches %d/%m/%Y before %m/%d/%Y is tried.
        assert_eq!(
            parse_form_date("05/04/2025"),
            NaiveDate::from_ymd_opt(2025, 4, 5)
        );
    }

    #[test]
    fn unparseable_dates_resolve_to_none() {
        for input in ["", "  ", "tomorrow", "2025-13-01", "30-12-2025"] {
            assert_eq!(parse_form_date(input), None, "input {input:?}");
        }
    }

    #[test]
    fn submitted_by_matches_by_substring_case_insensitive() {
        assert_eq!(map_submitted_by("IT Department"), SubmittedBy::ItDept);
        assert_eq!(map_submitted_by("  Ops Support  "), SubmittedBy::OpsSupport);
        assert_eq!(
            map_submitted_by("the executive office floor"),
            SubmittedBy::ExecutiveOffice
        );
        assert_eq!(map_submitted_by("Finance & Accounting"), SubmittedBy::FinAcc);
        assert_eq!(map_submitted_by("maresanm"), SubmittedBy::Maresanm);
    }

    #[test]
    fn submitted_by_falls_back_to_default() {
        assert_eq!(map_submitted_by(""), SubmittedBy::ItDept);
        assert_eq!(map_submitted_by("warehouse"), SubmittedBy::ItDept);
    }

    #[test]
    fn vendor_selection_first_match_wins() {
        assert_eq!(
            map_vendor_selection_method("Tender Process"),
            VendorSelectionMethod::TenderProcess
        );
        assert_eq!(
            map_vendor_selection_method("sole source"),
            VendorSelectionMethod::SoleSourceVendor
        );
        // "open tender round" only matches the bare "tender" phrase.
        assert_eq!(
            map_vendor_selection_method("open tender round"),
            VendorSelectionMethod::TenderProcess
        );
        assert_eq!(
            map_vendor_selection_method("direct award"),
            VendorSelectionMethod::SoleSourceVendor
        );
    }

    #[test]
    fn attachment_tags_remap_known_fields_and_pass_through_unknown() {
        assert_eq!(attachment_tag("photoImages"), "photo_images");
        assert_eq!(attachment_tag("billOfQuantity"), "bill_of_quantity");
        assert_eq!(attachment_tag("layout"), "layout");
        assert_eq!(attachment_tag("sitePlan"), "sitePlan");
    }

    #[test]
    fn codes_render_their_stored_form() {
        assert_eq!(SubmittedBy::FinAcc.as_str(), "Fin_Acc");
        assert_eq!(SubmittedBy::OpsTechnical.to_string(), "Ops_Technical");
        assert_eq!(
            VendorSelectionMethod::TenderProcess.as_str(),
            "tender_process"
        );
    }
}
