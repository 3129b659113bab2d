//! releasefix-lib: Core types and logic for releasefix
//!
//! This crate finds Helm 2 releases stored by Tiller and remaps deprecated
//! resource types in their manifests:
//! - `codec`: decodes the `base64(gzip(protobuf))` release payload
//! - `document`: formatting-preserving model of a multi-document manifest
//! - `rewrite`: the (apiVersion, kind) migration table and the rewrite pass
//! - `store`: lists deployed release records from a cluster or a file
//! - `process`: runs each record through the pipeline and reports outcomes

pub mod codec;
pub mod consts;
pub mod document;
pub mod paths;
pub mod process;
pub mod rewrite;
pub mod store;
