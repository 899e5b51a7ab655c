#![allow(missing_docs)]

pub(crate) mod form;
pub(crate) mod html;
pub(crate) mod http;
pub(crate) mod store;

pub(crate) use form::{assert_hx_endpoint, must_get_form_by_id};
pub(crate) use html::{
    assert_valid_html, must_get_text, parse_html_document, parse_html_fragment,
};
pub(crate) use http::assert_html_ok;
pub(crate) use store::{
    COFFEE_CODE, RecordingStore, SOLD_OUT_CODE, StoreOperation, TEA_CODE, get_test_workbook,
    must_get_log, must_get_stock,
};
