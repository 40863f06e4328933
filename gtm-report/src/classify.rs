//! Per-tag marketing attributes derived from tag metadata and configuration.

use gtm_export_core::Tag;

use crate::lookup::LookupTables;

pub const USER_ID_VARIABLE: &str = "{{DL - userId}}";
pub const ANONYMOUS_ID_VARIABLE: &str = "{{DL - anonymousId}}";
pub const ORDER_ID_VARIABLES: &[&str] = &["{{DL - order_id}}", "{{DL - orderID}}"];
pub const ORDER_AMOUNT_VARIABLE: &str = "{{DL - total}}";
pub const PRODUCT_VARIABLES: &[&str] = &[
    "{{DL - product}}",
    "{{DL - product_id}}",
    "{{DL - productCategory}}",
];

/// Ad network shown when no keyword matches.
pub const UNKNOWN_AD_NETWORK: &str = "N/A";
/// Display type for tags without a type code.
pub const UNKNOWN_TAG_TYPE: &str = "Unknown";

/// Which tag field the ad network keywords are matched against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AdNetworkKey {
    /// Tag name only.
    Name,
    /// Tag type code only.
    Type,
    /// Tag name, then the type code when the name matches nothing.
    #[default]
    Auto,
}

/// Derived attributes for one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagClassification {
    pub display_type: String,
    pub ad_network: String,
    pub integration: String,
    pub user_id_present: bool,
    pub anonymous_id_present: bool,
    pub location_applicable: bool,
    pub order_id_present: bool,
    pub order_amount_present: bool,
    pub product_details_present: bool,
}

pub fn classify(tag: &Tag, tables: &LookupTables, key: AdNetworkKey) -> TagClassification {
    let ad_network = ad_network(tag, tables, key).to_string();
    let integration = tables.integration(&ad_network).to_string();
    // CAPI is never produced by the mode table but still counts here.
    let location_applicable = integration == "dual" || integration == "CAPI";

    TagClassification {
        display_type: display_type(tag, tables),
        user_id_present: tag.references(USER_ID_VARIABLE),
        anonymous_id_present: tag.references(ANONYMOUS_ID_VARIABLE),
        location_applicable,
        order_id_present: tag.references_any(ORDER_ID_VARIABLES),
        order_amount_present: tag.references(ORDER_AMOUNT_VARIABLE),
        product_details_present: tag.references_any(PRODUCT_VARIABLES),
        ad_network,
        integration,
    }
}

fn ad_network<'a>(tag: &Tag, tables: &'a LookupTables, key: AdNetworkKey) -> &'a str {
    let by_name = || tag.name.as_deref().and_then(|name| tables.ad_network(name));
    let by_type = || tag.tag_type.as_deref().and_then(|code| tables.ad_network(code));

    let found = match key {
        AdNetworkKey::Name => by_name(),
        AdNetworkKey::Type => by_type(),
        AdNetworkKey::Auto => by_name().or_else(by_type),
    };
    found.unwrap_or(UNKNOWN_AD_NETWORK)
}

fn display_type(tag: &Tag, tables: &LookupTables) -> String {
    match tag.tag_type.as_deref().filter(|code| !code.is_empty()) {
        Some(code) => tables.tag_type_name(code).unwrap_or(code).to_string(),
        None => UNKNOWN_TAG_TYPE.to_string(),
    }
}
