mod function_code;
mod message_type;
mod part;
mod part_attributes;
mod part_kind;
pub(crate) mod parts;
mod reply;
mod request;
pub(crate) mod util;
pub(crate) mod util_sync;

pub use self::function_code::FunctionCode;
pub(crate) use self::{
    message_type::MessageType, part::Part, part_attributes::PartAttributes, part_kind::PartKind,
    reply::Reply, request::Request,
};
