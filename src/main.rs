use std::env;

use podmark::container::ContainerStore;
use podmark::engine::Engine;
use podmark::external::pod::PodTransport;
use podmark::external::session::EnvSession;
use podmark::server::serve;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let session = EnvSession::from_env().unwrap();
    let catalog_locator = env::var("PLACES_CATALOG_URL").unwrap();

    let store = ContainerStore::new(PodTransport::new(session));
    let engine = Engine::new(store, catalog_locator);

    serve(engine).await;
}
