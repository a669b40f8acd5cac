use serde::{Deserialize, Serialize};

/// Status message returned by the collector, e.g. `{"text":"Success","code":0}`.
///
/// The code table is closed; extending it is a design decision, not a patch,
/// since a mis-classified code either retries forever or gives up too early.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub text: String,
    pub code: i32,
}

pub const STATUS_SUCCESS: i32 = 0;
pub const STATUS_TOKEN_DISABLED: i32 = 1;
pub const STATUS_TOKEN_REQUIRED: i32 = 2;
pub const STATUS_INVALID_AUTHORIZATION: i32 = 3;
pub const STATUS_INVALID_TOKEN: i32 = 4;
pub const STATUS_NO_DATA: i32 = 5;
pub const STATUS_INVALID_DATA_FORMAT: i32 = 6;
pub const STATUS_INCORRECT_INDEX: i32 = 7;
pub const STATUS_INTERNAL_SERVER_ERROR: i32 = 8;
pub const STATUS_SERVER_BUSY: i32 = 9;
pub const STATUS_CHANNEL_MISSING: i32 = 10;
pub const STATUS_INVALID_CHANNEL: i32 = 11;
pub const STATUS_EVENT_FIELD_REQUIRED: i32 = 12;
pub const STATUS_EVENT_FIELD_BLANK: i32 = 13;
pub const STATUS_ACK_DISABLED: i32 = 14;

/// True only for the codes designating a transient server-side condition.
pub fn retriable(code: i32) -> bool {
    code == STATUS_SERVER_BUSY || code == STATUS_INTERNAL_SERVER_ERROR
}

impl Response {
    pub(crate) fn from_body(body: &str) -> Self {
        // An unparseable body is carried through as-is with a non-retriable code.
        serde_json::from_str(body).unwrap_or_else(|_| Response {
            text: body.to_string(),
            code: STATUS_SUCCESS,
        })
    }

    pub fn is_retriable(&self) -> bool {
        retriable(self.code)
    }
}
