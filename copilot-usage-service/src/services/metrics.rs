use crate::models::OrgType;
use metrics::counter;

/// Record one upstream usage fetch. `outcome` is `success` or an
/// `UpstreamErrorKind` name.
pub fn record_usage_fetch(org_type: OrgType, outcome: &'static str) {
    counter!(
        "copilot_usage_fetches_total",
        "org_type" => org_type.as_str(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a request rejected before reaching GitHub.
pub fn record_rejected_request() {
    counter!("copilot_usage_rejected_requests_total").increment(1);
}
