mod request;
mod response;

pub use request::{Address, OrderRequest, ReceiverDetails, ReceiverName, ShipmentDetails};
pub use response::{OrderCreated, OrderId};
