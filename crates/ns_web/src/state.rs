use ns_scrapers::SharedRegistry;

#[derive(Clone)]
pub struct AppState {
    pub registry: SharedRegistry,
}
