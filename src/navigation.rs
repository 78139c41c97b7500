use std::future::Future;
use std::sync::Arc;

use async_channel::Receiver;
use uuid::Uuid;

use crate::container::{self, ContainerStore, ContainerTransport};
use crate::entities::{Comment, Map, Photo, Place, Placemark, Rating};
use crate::error::{invalid_input_error, invalid_invocation_error, Error};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Detail {
    Overview,
    Reviews,
}

#[derive(Clone, Debug)]
pub enum PlaceState {
    Loading,
    Ready(Place),
    Failed(String),
}

#[derive(Clone, Debug)]
pub enum View {
    Browsing,
    Placing { latitude: f64, longitude: f64 },
    DetailForm { latitude: f64, longitude: f64 },
    Viewing {
        locator: String,
        tab: Detail,
        place: PlaceState,
    },
}

impl View {
    pub fn name(&self) -> String {
        match self {
            Self::Browsing => "browsing".into(),
            Self::Placing { .. } => "placing".into(),
            Self::DetailForm { .. } => "detail_form".into(),
            Self::Viewing { .. } => "viewing".into(),
        }
    }
}

// the form only knows these field identifiers; anything else is rejected
#[derive(Clone, Debug, Default)]
pub struct PlaceForm {
    pub title: String,
    pub description: String,
    pub category: String,
}

impl PlaceForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), Error> {
        match name {
            "title" => self.title = value.into(),
            "description" => self.description = value.into(),
            "category" => self.category = value.into(),
            _ => return Err(invalid_input_error()),
        }

        Ok(())
    }
}

// handed out by select(); a resolution is applied only while its epoch is
// still the current one
#[derive(Clone, Debug)]
pub struct PlaceTicket {
    epoch: u64,
    locator: String,
}

impl PlaceTicket {
    pub fn locator(&self) -> &str {
        &self.locator
    }
}

pub struct Navigator<T: ContainerTransport + Send + Sync + 'static> {
    store: Arc<ContainerStore<T>>,
    author: String,
    storage_root: String,
    map: Map,
    view: View,
    previous: Option<View>,
    filter: Option<Vec<String>>,
    epoch: u64,
}

impl<T: ContainerTransport + Send + Sync + 'static> Navigator<T> {
    pub fn new(
        store: Arc<ContainerStore<T>>,
        author: String,
        storage_root: String,
        map: Map,
    ) -> Self {
        Self {
            store,
            author,
            storage_root,
            map,
            view: View::Browsing,
            previous: None,
            filter: None,
            epoch: 0,
        }
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn map(&self) -> &Map {
        &self.map
    }

    pub fn center(&self) -> (f64, f64) {
        self.map.center()
    }

    pub fn set_filter(&mut self, categories: Option<Vec<String>>) {
        self.filter = categories;
    }

    // rendering predicate only; the aggregate is left untouched
    pub fn visible_placemarks(&self) -> Vec<&Placemark> {
        self.map
            .placemarks()
            .iter()
            .filter(|p| match &self.filter {
                Some(categories) => categories.iter().any(|c| c == &p.category),
                None => true,
            })
            .collect()
    }

    // a click already claimed by an overlapping element must not start a placement
    pub fn click(&mut self, latitude: f64, longitude: f64, consumed: bool) -> Result<(), Error> {
        if consumed {
            return Ok(());
        }

        match self.view {
            View::Browsing => {
                self.view = View::Placing {
                    latitude,
                    longitude,
                };
                Ok(())
            }
            _ => Err(invalid_invocation_error()),
        }
    }

    pub fn cancel(&mut self) -> Result<(), Error> {
        match self.view {
            View::Placing { .. } => {
                self.view = View::Browsing;
                Ok(())
            }
            _ => Err(invalid_invocation_error()),
        }
    }

    pub fn confirm(&mut self) -> Result<(), Error> {
        match self.view {
            View::Placing {
                latitude,
                longitude,
            } => {
                self.view = View::DetailForm {
                    latitude,
                    longitude,
                };
                Ok(())
            }
            _ => Err(invalid_invocation_error()),
        }
    }

    // the transition back to Browsing never waits on persistence: the write
    // runs as its own task and the returned receiver resolves once it lands
    // (or fails). Failures stay behind the optimistic acknowledgement.
    pub fn submit(&mut self, form: PlaceForm) -> Result<Receiver<Result<(), Error>>, Error> {
        let (latitude, longitude) = match self.view {
            View::DetailForm {
                latitude,
                longitude,
            } => (latitude, longitude),
            _ => return Err(invalid_invocation_error()),
        };

        let place = Place::new(form.title.clone(), latitude, longitude, form.description);
        let place_locator = container::place_locator(&self.storage_root, Uuid::new_v4());

        let mut placemark = Placemark::new(latitude, longitude);
        placemark.title = form.title;
        placemark.category = form.category;
        placemark.place_url = Some(place_locator.clone());

        self.map.add(placemark.clone());
        self.view = View::Browsing;

        let store = self.store.clone();
        let placemarks_locator = container::placemarks_locator(&self.storage_root);

        Ok(spawn_persist(async move {
            store.save_place(&place, &place_locator).await?;
            store.save_placemark(&placemark, &placemarks_locator).await
        }))
    }

    // the caller drives the fetch and reports back through resolve_place
    pub fn select(&mut self, locator: &str) -> Result<PlaceTicket, Error> {
        match self.view {
            View::Browsing => {
                let next = View::Viewing {
                    locator: locator.to_string(),
                    tab: Detail::Overview,
                    place: PlaceState::Loading,
                };
                self.previous = Some(std::mem::replace(&mut self.view, next));
                self.epoch += 1;

                Ok(PlaceTicket {
                    epoch: self.epoch,
                    locator: locator.to_string(),
                })
            }
            _ => Err(invalid_invocation_error()),
        }
    }

    // resolutions that arrive after the user navigated away are dropped; a
    // failed fetch stays on screen as an error, never a silent fallback
    pub fn resolve_place(&mut self, ticket: &PlaceTicket, result: Result<Place, Error>) {
        if ticket.epoch != self.epoch {
            return;
        }

        if let View::Viewing { locator, place, .. } = &mut self.view {
            if locator != &ticket.locator {
                return;
            }

            *place = match result {
                Ok(fetched) => PlaceState::Ready(fetched),
                Err(err) => PlaceState::Failed(err.message),
            };
        }
    }

    // same place, different sub-view; never re-fetches
    pub fn switch_tab(&mut self, tab: Detail) -> Result<(), Error> {
        match &mut self.view {
            View::Viewing { tab: current, .. } => {
                *current = tab;
                Ok(())
            }
            _ => Err(invalid_invocation_error()),
        }
    }

    // one level of history only; anything deeper collapses to Browsing
    pub fn back(&mut self) {
        self.view = self.previous.take().unwrap_or(View::Browsing);
    }

    pub fn submit_comment(&self, text: &str) -> Result<Receiver<Result<(), Error>>, Error> {
        if text.trim().is_empty() {
            return Err(invalid_input_error());
        }

        let locator = self.viewing_locator()?;
        let comment = Comment::new(self.author.clone(), text.to_string());
        let store = self.store.clone();

        Ok(spawn_persist(async move {
            store.add_comment(&comment, &locator).await
        }))
    }

    pub fn submit_rating(&self, score: f64) -> Result<Receiver<Result<(), Error>>, Error> {
        let locator = self.viewing_locator()?;
        let rating = Rating::new(self.author.clone(), score);
        let store = self.store.clone();

        Ok(spawn_persist(async move {
            store.add_rating(&rating, &locator).await
        }))
    }

    pub fn submit_photo(&self, url: &str) -> Result<Receiver<Result<(), Error>>, Error> {
        if url.is_empty() {
            return Err(invalid_input_error());
        }

        let locator = self.viewing_locator()?;
        let photo = Photo::new(self.author.clone(), url.to_string());
        let store = self.store.clone();

        Ok(spawn_persist(async move {
            store.add_photo(&photo, &locator).await
        }))
    }

    // re-reads the user's placemark container into the in-memory map
    pub async fn restore(&mut self) -> Result<(), Error> {
        let locator = container::placemarks_locator(&self.storage_root);

        let placemarks = match self.store.fetch_placemarks(&locator).await {
            Ok(placemarks) => placemarks,
            Err(err) if err.is_not_found() => Vec::new(),
            Err(err) => return Err(err),
        };

        for placemark in placemarks {
            self.map.add(placemark);
        }

        Ok(())
    }

    fn viewing_locator(&self) -> Result<String, Error> {
        match &self.view {
            View::Viewing { locator, .. } => Ok(locator.clone()),
            _ => Err(invalid_invocation_error()),
        }
    }
}

fn spawn_persist<F>(task: F) -> Receiver<Result<(), Error>>
where
    F: Future<Output = Result<(), Error>> + Send + 'static,
{
    let (tx, rx) = async_channel::bounded(1);

    tokio::spawn(async move {
        let result = task.await;

        if let Err(err) = &result {
            tracing::error!(code = err.code, message = %err.message, "persistence failed");
        }

        let _ = tx.send(result).await;
    });

    rx
}

#[cfg(test)]
mod tests {
    use tokio_test::block_on;

    use super::*;
    use crate::container::testing::MemTransport;
    use crate::error::not_found_error;

    const ROOT: &str = "https://pod.example/alice";
    const WEB_ID: &str = "https://id.example/alice#me";

    fn navigator() -> (Navigator<MemTransport>, Arc<ContainerStore<MemTransport>>) {
        let store = Arc::new(ContainerStore::new(MemTransport::new()));
        let navigator = Navigator::new(
            store.clone(),
            WEB_ID.into(),
            ROOT.into(),
            Map::new("test".into()),
        );

        (navigator, store)
    }

    async fn seeded_place(store: &ContainerStore<MemTransport>) -> String {
        let locator = container::place_locator(ROOT, Uuid::new_v4());
        let place = Place::new("Cafe".into(), 1.0, 2.0, "espresso".into());
        store.save_place(&place, &locator).await.unwrap();

        locator
    }

    #[test]
    fn click_then_cancel_leaves_the_map_unchanged() {
        let (mut navigator, _) = navigator();

        navigator.click(43.55, -5.92, false).unwrap();
        assert_eq!(navigator.view().name(), "placing");

        navigator.cancel().unwrap();
        assert_eq!(navigator.view().name(), "browsing");
        assert_eq!(navigator.map().len(), 0);
    }

    #[test]
    fn consumed_clicks_are_ignored() {
        let (mut navigator, _) = navigator();

        navigator.click(1.0, 2.0, true).unwrap();

        assert_eq!(navigator.view().name(), "browsing");
    }

    #[test]
    fn confirm_and_submit_append_exactly_one_placemark() {
        block_on(async {
            let (mut navigator, store) = navigator();

            navigator.click(43.55, -5.92, false).unwrap();
            navigator.confirm().unwrap();

            let mut form = PlaceForm::new();
            form.set_field("title", "Lighthouse").unwrap();
            form.set_field("description", "at the cape").unwrap();

            let done = navigator.submit(form).unwrap();
            // the transition does not wait for persistence
            assert_eq!(navigator.view().name(), "browsing");
            assert_eq!(navigator.map().len(), 1);

            done.recv().await.unwrap().unwrap();

            let placemark = navigator.map().placemarks().last().unwrap();
            assert_eq!(placemark.latitude, 43.55);
            assert_eq!(placemark.longitude, -5.92);
            assert_eq!(placemark.title, "Lighthouse");

            // the write landed in the user's container as well
            let saved = store
                .fetch_placemarks(&container::placemarks_locator(ROOT))
                .await
                .unwrap();
            assert_eq!(saved.len(), 1);
        });
    }

    #[test]
    fn unknown_form_fields_are_rejected() {
        let mut form = PlaceForm::new();

        assert!(form.set_field("title", "ok").is_ok());
        assert!(form.set_field("__proto__", "nope").is_err());
    }

    #[test]
    fn persistence_failures_stay_behind_the_optimistic_ack() {
        block_on(async {
            let (mut navigator, store) = navigator();
            store.transport().fail();

            navigator.click(1.0, 2.0, false).unwrap();
            navigator.confirm().unwrap();

            let done = navigator.submit(PlaceForm::new()).unwrap();
            assert_eq!(navigator.view().name(), "browsing");
            assert_eq!(navigator.map().len(), 1);

            assert!(done.recv().await.unwrap().is_err());
            // still browsing, nothing surfaced past the ack
            assert_eq!(navigator.view().name(), "browsing");
        });
    }

    #[test]
    fn switching_tabs_never_refetches() {
        block_on(async {
            let (mut navigator, store) = navigator();
            let locator = seeded_place(&store).await;

            let ticket = navigator.select(&locator).unwrap();
            assert!(matches!(
                navigator.view(),
                View::Viewing {
                    place: PlaceState::Loading,
                    ..
                }
            ));

            let fetched = store.fetch_place(ticket.locator()).await;
            navigator.resolve_place(&ticket, fetched);

            let fetches = store.transport().get_count();

            navigator.switch_tab(Detail::Reviews).unwrap();
            navigator.switch_tab(Detail::Overview).unwrap();

            assert_eq!(store.transport().get_count(), fetches);
            match navigator.view() {
                View::Viewing {
                    tab,
                    place: PlaceState::Ready(place),
                    ..
                } => {
                    assert_eq!(*tab, Detail::Overview);
                    assert_eq!(place.title, "Cafe");
                }
                view => panic!("unexpected view {}", view.name()),
            }
        });
    }

    #[test]
    fn a_failed_fetch_leaves_an_error_affordance() {
        let (mut navigator, _) = navigator();

        let ticket = navigator
            .select("https://pod.example/alice/public/places/missing")
            .unwrap();
        navigator.resolve_place(&ticket, Err(not_found_error()));

        assert!(matches!(
            navigator.view(),
            View::Viewing {
                place: PlaceState::Failed(_),
                ..
            }
        ));
    }

    #[test]
    fn stale_resolutions_are_dropped() {
        let (mut navigator, _) = navigator();

        let ticket = navigator.select("https://a").unwrap();
        navigator.back();
        navigator.resolve_place(&ticket, Ok(Place::new("old".into(), 1.0, 2.0, "".into())));
        assert_eq!(navigator.view().name(), "browsing");

        // a superseded selection never applies either
        let stale = navigator.select("https://a").unwrap();
        navigator.back();
        let _fresh = navigator.select("https://b").unwrap();
        navigator.resolve_place(&stale, Ok(Place::new("old".into(), 1.0, 2.0, "".into())));

        assert!(matches!(
            navigator.view(),
            View::Viewing {
                place: PlaceState::Loading,
                ..
            }
        ));
    }

    #[test]
    fn back_navigation_is_single_slot() {
        let (mut navigator, _) = navigator();

        navigator.select("https://a").unwrap();
        navigator.back();
        assert_eq!(navigator.view().name(), "browsing");

        navigator.back();
        assert_eq!(navigator.view().name(), "browsing");
    }

    #[test]
    fn comments_require_text_and_land_in_the_place_container() {
        block_on(async {
            let (mut navigator, store) = navigator();
            let locator = seeded_place(&store).await;

            let ticket = navigator.select(&locator).unwrap();
            let fetched = store.fetch_place(ticket.locator()).await;
            navigator.resolve_place(&ticket, fetched);

            assert!(navigator.submit_comment("   ").is_err());

            let done = navigator.submit_comment("lovely").unwrap();
            done.recv().await.unwrap().unwrap();

            let place = store.fetch_place(&locator).await.unwrap();
            assert_eq!(place.comments.len(), 1);
            assert_eq!(place.comments[0].text, "lovely");
            assert_eq!(place.comments[0].author, WEB_ID);
        });
    }

    #[test]
    fn ratings_and_photos_append_to_the_place_container() {
        block_on(async {
            let (mut navigator, store) = navigator();
            let locator = seeded_place(&store).await;

            let ticket = navigator.select(&locator).unwrap();
            let fetched = store.fetch_place(ticket.locator()).await;
            navigator.resolve_place(&ticket, fetched);

            navigator.submit_rating(4.0).unwrap().recv().await.unwrap().unwrap();
            navigator
                .submit_photo("https://img.example/1")
                .unwrap()
                .recv()
                .await
                .unwrap()
                .unwrap();

            let place = store.fetch_place(&locator).await.unwrap();
            assert_eq!(place.ratings.len(), 1);
            assert_eq!(place.photos.len(), 1);
        });
    }

    #[test]
    fn the_category_filter_is_a_pure_predicate() {
        let store = Arc::new(ContainerStore::new(MemTransport::new()));
        let mut map = Map::new("test".into());

        let mut museum = Placemark::new(1.0, 2.0);
        museum.category = "museum".into();
        let mut bar = Placemark::new(3.0, 4.0);
        bar.category = "bar".into();
        map.add(museum);
        map.add(bar);

        let mut navigator = Navigator::new(store, WEB_ID.into(), ROOT.into(), map);

        navigator.set_filter(Some(vec!["museum".into()]));
        assert_eq!(navigator.visible_placemarks().len(), 1);
        assert_eq!(navigator.map().len(), 2);

        navigator.set_filter(None);
        assert_eq!(navigator.visible_placemarks().len(), 2);
    }

    #[test]
    fn restore_reloads_previously_saved_placemarks() {
        block_on(async {
            let (mut navigator, store) = navigator();

            // an untouched pod restores to an empty map
            navigator.restore().await.unwrap();
            assert_eq!(navigator.map().len(), 0);

            let locator = container::placemarks_locator(ROOT);
            let mut placemark = Placemark::new(5.0, 6.0);
            placemark.title = "Harbour".into();
            store.save_placemark(&placemark, &locator).await.unwrap();

            navigator.restore().await.unwrap();
            assert_eq!(navigator.map().len(), 1);
            assert_eq!(navigator.map().placemarks()[0].title, "Harbour");
        });
    }
}
