// REST backend for the community business directory: public listing and
// submission, admin-gated edits, JSON-snapshot document store.
pub mod server;
