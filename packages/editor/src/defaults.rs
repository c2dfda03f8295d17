//! Starter document for "skip & fill manually".
//!
//! Every field is present with an empty value so the generator sees the
//! full shape without anything invented for it.

use crate::document::Value;
use serde_json::json;

pub const DEFAULT_LOE_TYPE: &str = "rack_stack";

/// Rack-and-stack template with `loe_type` set
pub fn default_document(loe_type: &str) -> Value {
    Value::from(json!({
        "loe_type": loe_type,
        "client": "",
        "project_name": "",
        "service": "rack and stack",
        "scope": "",
        "environment": "",
        "timeline": "",
        "sites": [{ "name": "", "address": "" }],
        "devices": [],
        "bom": [],
        "deliverables": [],
        "constraints": [],
        "notes_raw": "",
        "staging": {
            "ic_used": false,
            "doa": false,
            "burn_in": false,
            "labelling": "",
            "packing": ""
        },
        "rollout": {
            "waves": "",
            "floors": "",
            "ooh_windows": "",
            "change_approvals": ""
        },
        "visits_caps": {
            "install_max_visits": null,
            "post_deploy_max_visits": null,
            "site_survey_window_weeks": null
        },
        "brackets": [],
        "counts": {
            "devices_total": null,
            "aps_ordered": null,
            "aps_to_mount": null
        },
        "governance": {
            "pm_client": "",
            "pm_wwt": "",
            "comms_channel": "",
            "change_approvals": "",
            "escalation": ""
        },
        "handover": {
            "deliverables": [],
            "acceptance_criteria": "",
            "docs": ""
        },
        "wave_plan": [],
        "prerequisites": [],
        "assumptions": [],
        "out_of_scope": []
    }))
}
