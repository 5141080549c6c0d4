#![forbid(unsafe_code)]

/// `embed_migrations!` cannot tell when a migration file changes on its own,
/// so the crate is rebuilt whenever the migrations directory does.
fn main() {
    println!("cargo:rerun-if-changed=./migrations");
}
