// Backend gateway: everything the UI layer treats as an opaque collaborator.
//
// The request/response surface is the `BackendGateway` trait; asynchronous
// notifications flow through the `EventBus`.

pub mod api;
pub mod events;
pub mod firmware;
pub mod gateway;
pub mod serial;

pub use events::{BackendEvent, EventBus, EventStream};
pub use gateway::{BackendGateway, GatewayError, MeshBackend};
