//! Web worker entry point. The page spawns this script and talks to it with
//! `SearchWorker::spawner()`.

#[cfg(target_arch = "wasm32")]
fn main() {
    use archess_core::worker::SearchWorker;
    use gloo_worker::Registrable;

    SearchWorker::registrar().register();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    eprintln!("search_worker only runs as a wasm32 web worker");
}
