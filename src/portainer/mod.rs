//! Portainer interaction layer
//!
//! Handles all communication with the Portainer API:
//! - Stack listing (`/api/stacks`)
//! - Container listing for one endpoint (Docker proxy)
//! - Decoding raw responses into typed summaries

pub mod client;

pub use client::{
    decode_containers, decode_stacks, ContainerSummary, PortDescriptor, PortainerClient,
    StackSummary,
};
