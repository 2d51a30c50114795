//! Composite work-order payload and its extraction into row-sets.
//!
//! The creation request bundles the submission form, the work-item list, the
//! attachment flags, and the tender/vendor block as independently
//! JSON-encoded string fields. [`CompositeWorkOrderRequest::extract`] decodes
//! each field, normalizes free-text values into their fixed code sets, and
//! produces the row-sets the service persists in one transaction.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::entities::{supporting_document, work_order, work_order_item, work_order_vendor};
use crate::errors::ServiceError;
use crate::mapping::{
    attachment_tag, map_submitted_by, map_vendor_selection_method, parse_form_date, SubmittedBy,
    VendorSelectionMethod,
};

/// Composite creation / full-replace request.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CompositeWorkOrderRequest {
    #[validate(length(min = 1, max = 200))]
    pub name: String,
    /// JSON-encoded submission form object
    pub form_data: String,
    /// JSON-encoded array of work items
    pub work_items: String,
    /// JSON-encoded object of attachment flags
    pub attachments: String,
    /// JSON-encoded authorization chain (carried, not interpreted)
    pub authorizations: String,
    /// JSON-encoded tender/vendor block
    pub tender_vendor_data: String,
    pub total_cost: Decimal,
}

/// Decoded form object. Unknown form fields are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct FormData {
    wor_no: String,
    date: Option<String>,
    #[serde(rename = "isWOR")]
    is_wor: bool,
    submitted_by: String,
    submitted_division: String,
    scope_of_work: String,
    start_date: Option<String>,
    end_date: Option<String>,
    is_urgent: bool,
    #[serde(default = "default_true")]
    is_budgeted: bool,
    #[serde(default = "default_cost_type")]
    cost_type: String,
    budget_index: String,
    budget_name: String,
    cost_estimation: Option<Decimal>,
    budget_remaining: Option<Decimal>,
    budget_under_over: String,
    charge_to_tenant: bool,
    vendor_name: String,
    vendor_reason: String,
    #[serde(default = "default_selection_method")]
    vendor_selection_method: String,
}

fn default_true() -> bool {
    true
}

fn default_cost_type() -> String {
    "CAPEX".to_string()
}

fn default_selection_method() -> String {
    "tender_process".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WorkItemInput {
    #[serde(default)]
    description: String,
    #[serde(default = "default_quantity")]
    quantity: Decimal,
    #[serde(default)]
    unit_price: Decimal,
}

fn default_quantity() -> Decimal {
    Decimal::ONE
}

/// Tender/vendor block. Only the description and the vendor list feed the
/// persisted rows; the remaining fields are accepted for shape validation.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct TenderVendorData {
    #[allow(dead_code)]
    is_tender_required: Option<bool>,
    tender_description: String,
    #[allow(dead_code)]
    tender_date: Option<String>,
    #[allow(dead_code)]
    tender_evaluation_criteria: Option<String>,
    vendors: Vec<VendorInput>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VendorInput {
    #[allow(dead_code)]
    id: i64,
    #[serde(default)]
    vendor_name: String,
}

/// Header column values extracted from the composite payload.
#[derive(Debug, Clone)]
pub struct ExtractedHeader {
    pub document_number: String,
    pub request_date: NaiveDate,
    pub request_type: String,
    pub submitted_by: SubmittedBy,
    pub scope_of_works: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub is_urgent: bool,
    pub budget_status: String,
    pub cost_type: String,
    pub budget_index: String,
    pub budget_name: String,
    pub cost_estimation: Decimal,
    pub remaining_budget: Decimal,
    pub under_over: String,
    pub charge_to_tenant: bool,
    pub recommended_contractor: String,
    pub reason: String,
    pub vendor_selection_method: VendorSelectionMethod,
    pub test_and_analysis: String,
}

#[derive(Debug, Clone)]
pub struct ExtractedItem {
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub item_order: i32,
}

#[derive(Debug, Clone)]
pub struct ExtractedDocument {
    pub document_type: String,
    pub has_document: bool,
}

/// Row-sets ready for insertion.
#[derive(Debug, Clone)]
pub struct ExtractedComposite {
    pub header: ExtractedHeader,
    pub items: Vec<ExtractedItem>,
    pub vendor_names: Vec<String>,
    pub documents: Vec<ExtractedDocument>,
}

impl CompositeWorkOrderRequest {
    /// Decodes the embedded JSON fields and maps them to row-sets. Fails
    /// with a validation error naming the offending field.
    pub fn extract(&self) -> Result<ExtractedComposite, ServiceError> {
        let form: FormData = serde_json::from_str(&self.form_data)
            .map_err(|e| ServiceError::InvalidInput(format!("invalid formData JSON: {e}")))?;
        let items: Vec<WorkItemInput> = serde_json::from_str(&self.work_items).map_err(|e| {
            ServiceError::InvalidInput(format!("invalid workItems JSON (expected an array): {e}"))
        })?;
        let tender: TenderVendorData =
            serde_json::from_str(&self.tender_vendor_data).map_err(|e| {
                ServiceError::InvalidInput(format!("invalid tenderVendorData JSON: {e}"))
            })?;
        let attachments: serde_json::Map<String, Value> = serde_json::from_str(&self.attachments)
            .map_err(|e| {
            ServiceError::InvalidInput(format!("invalid attachments JSON (expected an object): {e}"))
        })?;
        serde_json::from_str::<Value>(&self.authorizations).map_err(|e| {
            ServiceError::InvalidInput(format!("invalid authorizations JSON: {e}"))
        })?;

        // request_date is a required column; an unparseable or absent form
        // date falls back to today.
        let request_date = form
            .date
            .as_deref()
            .and_then(parse_form_date)
            .unwrap_or_else(|| Utc::now().date_naive());
        let start_date = form.start_date.as_deref().and_then(parse_form_date);
        let end_date = form.end_date.as_deref().and_then(parse_form_date);

        let submitter_text = if form.submitted_by.is_empty() {
            &form.submitted_division
        } else {
            &form.submitted_by
        };

        let form_estimate = form.cost_estimation.unwrap_or(Decimal::ZERO);
        let cost_estimation = if form_estimate.is_zero() {
            self.total_cost
        } else {
            form_estimate
        };

        let header = ExtractedHeader {
            document_number: form.wor_no.trim().to_string(),
            request_date,
            request_type: if form.is_wor {
                "work_order_request".to_string()
            } else {
                "item_request".to_string()
            },
            submitted_by: map_submitted_by(submitter_text),
            scope_of_works: form.scope_of_work.trim().to_string(),
            start_date,
            end_date,
            is_urgent: form.is_urgent,
            budget_status: if form.is_budgeted {
                "budgeted".to_string()
            } else {
                "unbudgeted".to_string()
            },
            cost_type: form.cost_type,
            budget_index: form.budget_index.trim().to_string(),
            budget_name: form.budget_name.trim().to_string(),
            cost_estimation,
            remaining_budget: form.budget_remaining.unwrap_or(Decimal::ZERO),
            under_over: form.budget_under_over.trim().to_string(),
            charge_to_tenant: form.charge_to_tenant,
            recommended_contractor: form.vendor_name.trim().to_string(),
            reason: form.vendor_reason.trim().to_string(),
            vendor_selection_method: map_vendor_selection_method(&form.vendor_selection_method),
            test_and_analysis: tender.tender_description.trim().to_string(),
        };

        let items = items
            .into_iter()
            .enumerate()
            .map(|(idx, item)| ExtractedItem {
                total_price: item.quantity * item.unit_price,
                description: item.description,
                quantity: item.quantity,
                unit_price: item.unit_price,
                item_order: idx as i32 + 1,
            })
            .collect();

        let vendor_names = tender
            .vendors
            .iter()
            .map(|v| v.vendor_name.trim())
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect();

        let documents = attachments
            .iter()
            .map(|(field, value)| ExtractedDocument {
                document_type: attachment_tag(field).to_string(),
                has_document: truthy(value),
            })
            .collect();

        Ok(ExtractedComposite {
            header,
            items,
            vendor_names,
            documents,
        })
    }
}

/// Attachment flags arrive from loosely typed form code; anything that is
/// not a JSON false-equivalent counts as present.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Response for composite create and full replace.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompositeWriteResponse {
    pub work_order: work_order::Model,
    pub items_created: u64,
    pub total_cost: Decimal,
}

/// Read projection mirroring the composite request's structure.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrderFullResponse {
    pub id: i32,
    pub work_order: work_order::Model,
    pub work_items: Vec<WorkItemView>,
    pub tender_vendor_data: Vec<VendorView>,
    pub attachments: Vec<AttachmentView>,
    pub authorizations: Vec<Value>,
    /// Recomputed at read time as the sum of quantity x unit price;
    /// deliberately independent of the stored estimate.
    pub total_cost: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItemView {
    pub id: i32,
    pub description: String,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total_price: Decimal,
    pub item_order: i32,
}

impl From<work_order_item::Model> for WorkItemView {
    fn from(model: work_order_item::Model) -> Self {
        Self {
            id: model.id,
            description: model.description,
            quantity: model.quantity,
            unit_price: model.unit_price,
            total_price: model.total_price,
            item_order: model.item_order,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorView {
    pub id: i32,
    pub vendor_name: String,
}

impl From<work_order_vendor::Model> for VendorView {
    fn from(model: work_order_vendor::Model) -> Self {
        Self {
            id: model.id,
            vendor_name: model.vendor_name,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentView {
    pub document_type: String,
    pub has_document: bool,
}

impl From<supporting_document::Model> for AttachmentView {
    fn from(model: supporting_document::Model) -> Self {
        Self {
            document_type: model.document_type,
            has_document: model.has_document,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request(form_data: &str, work_items: &str, tender: &str) -> CompositeWorkOrderRequest {
        CompositeWorkOrderRequest {
            name: "WOR-TEST".into(),
            form_data: form_data.into(),
            work_items: work_items.into(),
            attachments: r#"{"layout":true,"photoImages":false}"#.into(),
            authorizations: "[]".into(),
            tender_vendor_data: tender.into(),
            total_cost: dec!(100),
        }
    }

    #[test]
    fn items_get_computed_totals_and_one_based_order() {
        let req = request(
            r#"{"worNo":"WO-1","date":"2025-12-30","isWOR":true,"submittedBy":"IT Dept"}"#,
            r#"[{"description":"Cable","quantity":2,"unitPrice":50},
                {"description":"Switch","quantity":1,"unitPrice":300}]"#,
            r#"{"vendors":[]}"#,
        );
        let extracted = req.extract().unwrap();
        assert_eq!(extracted.items.len(), 2);
        assert_eq!(extracted.items[0].total_price, dec!(100));
        assert_eq!(extracted.items[0].item_order, 1);
        assert_eq!(extracted.items[1].total_price, dec!(300));
        assert_eq!(extracted.items[1].item_order, 2);
    }

    #[test]
    fn item_defaults_are_quantity_one_price_zero() {
        let req = request(
            r#"{"worNo":"WO-1"}"#,
            r#"[{"description":"Labour"}]"#,
            r#"{"vendors":[]}"#,
        );
        let extracted = req.extract().unwrap();
        assert_eq!(extracted.items[0].quantity, dec!(1));
        assert_eq!(extracted.items[0].unit_price, dec!(0));
        assert_eq!(extracted.items[0].total_price, dec!(0));
    }

    #[test]
    fn unparseable_request_date_defaults_to_today() {
        let req = request(
            r#"{"worNo":"WO-1","date":"whenever"}"#,
            "[]",
            r#"{"vendors":[]}"#,
        );
        let extracted = req.extract().unwrap();
        assert_eq!(extracted.header.request_date, Utc::now().date_naive());
        assert_eq!(extracted.header.start_date, None);
    }

    #[test]
    fn zero_form_estimate_falls_back_to_total_cost() {
        let req = request(
            r#"{"worNo":"WO-1","costEstimation":0}"#,
            "[]",
            r#"{"vendors":[]}"#,
        );
        assert_eq!(req.extract().unwrap().header.cost_estimation, dec!(100));

        let req = request(
            r#"{"worNo":"WO-1","costEstimation":250.50}"#,
            "[]",
            r#"{"vendors":[]}"#,
        );
        assert_eq!(req.extract().unwrap().header.cost_estimation, dec!(250.50));
    }

    #[test]
    fn blank_vendor_names_are_dropped() {
        let req = request(
            r#"{"worNo":"WO-1"}"#,
            "[]",
            r#"{"vendors":[
                {"id":1,"vendorName":"Acme Pte Ltd"},
                {"id":2,"vendorName":"   "},
                {"id":3,"vendorName":""},
                {"id":4,"vendorName":"  Builders Co "}
            ]}"#,
        );
        let extracted = req.extract().unwrap();
        assert_eq!(extracted.vendor_names, vec!["Acme Pte Ltd", "Builders Co"]);
    }

    #[test]
    fn attachment_flags_become_tagged_documents() {
        let req = request(r#"{"worNo":"WO-1"}"#, "[]", r#"{"vendors":[]}"#);
        let extracted = req.extract().unwrap();
        let mut tags: Vec<_> = extracted
            .documents
            .iter()
            .map(|d| (d.document_type.as_str(), d.has_document))
            .collect();
        tags.sort();
        assert_eq!(tags, vec![("layout", true), ("photo_images", false)]);
    }

    #[test]
    fn submitter_falls_back_to_division_field() {
        let req = request(
            r#"{"worNo":"WO-1","submittedDivision":"Ops Technical"}"#,
            "[]",
            r#"{"vendors":[]}"#,
        );
        assert_eq!(
            req.extract().unwrap().header.submitted_by,
            SubmittedBy::OpsTechnical
        );
    }

    #[test]
    fn header_fields_map_and_trim() {
        let req = request(
            r#"{"worNo":"  WO-9 ","isWOR":false,"scopeOfWork":" replace cabling ",
                "isBudgeted":false,"budgetIndex":" BI-7 ","vendorName":" Acme ",
                "vendorSelectionMethod":"Sole Source"}"#,
            "[]",
            r#"{"tenderDescription":" load test ","vendors":[]}"#,
        );
        let header = req.extract().unwrap().header;
        assert_eq!(header.document_number, "WO-9");
        assert_eq!(header.request_type, "item_request");
        assert_eq!(header.scope_of_works, "replace cabling");
        assert_eq!(header.budget_status, "unbudgeted");
        assert_eq!(header.cost_type, "CAPEX");
        assert_eq!(header.budget_index, "BI-7");
        assert_eq!(header.recommended_contractor, "Acme");
        assert_eq!(
            header.vendor_selection_method,
            VendorSelectionMethod::SoleSourceVendor
        );
        assert_eq!(header.test_and_analysis, "load test");
    }

    #[test]
    fn malformed_sub_fields_name_the_field() {
        let mut req = request(r#"{"worNo":"WO-1"}"#, "[]", r#"{"vendors":[]}"#);
        req.form_data = "{not json".into();
        let err = req.extract().unwrap_err();
        assert!(err.to_string().contains("formData"), "{err}");

        let mut req = request(r#"{"worNo":"WO-1"}"#, "[]", r#"{"vendors":[]}"#);
        req.work_items = r#"{"not":"an array"}"#.into();
        let err = req.extract().unwrap_err();
        assert!(err.to_string().contains("workItems"), "{err}");

        let mut req = request(r#"{"worNo":"WO-1"}"#, "[]", r#"{"vendors":[]}"#);
        req.tender_vendor_data = r#"{"vendors":[{"vendorName":"no id"}]}"#.into();
        let err = req.extract().unwrap_err();
        assert!(err.to_string().contains("tenderVendorData"), "{err}");
    }
}
