//! Request builders: pure functions from caller inputs to native store requests.

mod expressions;
mod params;

pub use expressions::{
    filter_expression, key_condition, placeholder_token, update_expression, ExpressionParams,
};
pub use params::{
    build_delete, build_get, build_put, build_query, build_scan, build_update, item_key,
    page_from_response, ITEM_EXISTS_CONDITION,
};
