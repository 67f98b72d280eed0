//! Registration form state and the reducer that drives it.
//!
//! Every change, whether typed by the operator or delivered by a finished
//! request, arrives as a [`FormEvent`]. Applying an event mutates
//! [`FormState`] and returns the [`Effect`]s the caller has to run. Results of
//! those effects come back as further events.

use tracing::{debug, error, warn};

use crate::model::{
    CategoryId, CategoryItem, CityName, ContactField, ContactInfo, Coordinate,
    SelectedCategoryIds, Selection, StateCode, SubmissionRecord, UNSET_VALUE,
};
use crate::ports::PortError;

/// Placeholder label of the state dropdown.
pub const UF_PLACEHOLDER: &str = "Selecione uma UF";
/// Placeholder label of the city dropdown.
pub const CITY_PLACEHOLDER: &str = "Selecione uma cidade";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Progress of a remote request.
pub enum FetchStatus {
    /// Not requested yet.
    #[default]
    Idle,
    /// Request in flight.
    Loading,
    /// Last request succeeded.
    Ready,
    /// Last request failed with the given reason.
    Failed(String),
}

#[derive(Debug, Clone, Default)]
/// Remotely loaded value together with the status of its last request.
///
/// A failed request keeps whatever data was there before.
pub struct Remote<T> {
    /// Current data, possibly stale.
    pub data: T,
    /// Status of the most recent request.
    pub status: FetchStatus,
}

impl<T> Remote<T> {
    fn start(&mut self) {
        self.status = FetchStatus::Loading;
    }

    /// Forget an outstanding request; its response will be dropped.
    fn abandon(&mut self) {
        if self.status == FetchStatus::Loading {
            self.status = FetchStatus::Idle;
        }
    }

    fn finish(&mut self, result: Result<T, PortError>, what: &str) {
        match result {
            Ok(data) => {
                self.data = data;
                self.status = FetchStatus::Ready;
            }
            Err(err) => {
                warn!(error = %err, "failed to load {what}");
                self.status = FetchStatus::Failed(err.to_string());
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Tag attached to a municipality request.
pub struct CityRequest {
    /// State the request was issued for.
    pub uf: StateCode,
    /// Generation of the state selection at issue time.
    pub generation: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Progress of the registration request.
pub enum SubmissionStatus {
    /// Nothing submitted yet.
    #[default]
    Idle,
    /// Request in flight.
    Sending,
    /// Backend accepted the collection point.
    Sent,
    /// Request failed; the form is kept for another attempt.
    Failed(String),
}

#[derive(Debug)]
/// Everything that can change the form.
pub enum FormEvent {
    /// The registration screen opened.
    Mounted,
    /// Result of the position lookup.
    LocationResolved(Result<Coordinate, PortError>),
    /// Result of the category catalog request.
    CategoriesLoaded(Result<Vec<CategoryItem>, PortError>),
    /// Result of the state list request.
    StatesLoaded(Result<Vec<StateCode>, PortError>),
    /// Result of a municipality request.
    CitiesLoaded {
        /// Tag the request was issued with.
        request: CityRequest,
        /// Fetched municipalities.
        result: Result<Vec<CityName>, PortError>,
    },
    /// A contact field was edited.
    FieldEdited {
        /// Edited field.
        field: ContactField,
        /// New full value.
        value: String,
    },
    /// A state was picked in the dropdown.
    UfSelected(Selection<StateCode>),
    /// A city was picked in the dropdown.
    CitySelected(Selection<CityName>),
    /// The map was clicked.
    MapClicked(Coordinate),
    /// A category was clicked.
    CategoryToggled(CategoryId),
    /// The form was submitted.
    Submitted,
    /// Result of the registration request.
    SubmissionFinished(Result<(), PortError>),
}

#[derive(Debug, Clone, PartialEq)]
/// Side effect requested by the reducer.
pub enum Effect {
    /// Resolve the current position.
    Locate,
    /// Fetch the category catalog.
    LoadCategories,
    /// Fetch the state list.
    LoadStates,
    /// Fetch municipalities for the tagged state.
    LoadCities(CityRequest),
    /// Post the record to the backend.
    Submit(SubmissionRecord),
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Option of a dropdown.
pub struct DropdownOption {
    /// Value submitted when picked.
    pub value: String,
    /// Label shown to the operator.
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// Category as rendered in the selectable grid.
pub struct CategoryEntry<'a> {
    /// Catalog item.
    pub item: &'a CategoryItem,
    /// Whether the item is currently selected.
    pub selected: bool,
}

#[derive(Debug, Clone, Default)]
/// View state of the registration form.
pub struct FormState {
    /// Category catalog.
    pub categories: Remote<Vec<CategoryItem>>,
    /// Known state codes.
    pub states: Remote<Vec<StateCode>>,
    /// Municipalities of the last successfully loaded state.
    pub cities: Remote<Vec<CityName>>,
    /// Contact data.
    pub contact: ContactInfo,
    /// Accepted categories.
    pub selected_items: SelectedCategoryIds,
    /// Selected state.
    pub selected_uf: Selection<StateCode>,
    /// Selected city.
    pub selected_city: Selection<CityName>,
    /// Map center, seeded from the current position.
    pub initial_position: Coordinate,
    /// Position picked on the map.
    pub selected_position: Coordinate,
    /// Registration progress.
    pub submission: SubmissionStatus,
    mounted: bool,
    city_generation: u64,
}

impl FormState {
    /// Empty form with every field at its default.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an event and return the effects to run.
    pub fn apply(&mut self, event: FormEvent) -> Vec<Effect> {
        match event {
            FormEvent::Mounted => self.mount(),
            FormEvent::LocationResolved(result) => {
                match result {
                    Ok(position) => self.initial_position = position,
                    Err(err) => warn!(error = %err, "current position unavailable"),
                }
                Vec::new()
            }
            FormEvent::CategoriesLoaded(result) => {
                self.categories.finish(result, "categories");
                Vec::new()
            }
            FormEvent::StatesLoaded(result) => {
                self.states.finish(result, "states");
                Vec::new()
            }
            FormEvent::CitiesLoaded { request, result } => {
                if request.generation == self.city_generation {
                    self.cities.finish(result, "municipalities");
                } else {
                    debug!(
                        uf = %request.uf,
                        generation = request.generation,
                        current = self.city_generation,
                        "dropping stale municipality response"
                    );
                }
                Vec::new()
            }
            FormEvent::FieldEdited { field, value } => {
                self.contact.set(field, value);
                Vec::new()
            }
            FormEvent::UfSelected(selection) => self.select_uf(selection),
            FormEvent::CitySelected(selection) => {
                self.selected_city = selection;
                Vec::new()
            }
            FormEvent::MapClicked(position) => {
                self.selected_position = position;
                Vec::new()
            }
            FormEvent::CategoryToggled(id) => {
                self.selected_items.toggle(id);
                Vec::new()
            }
            FormEvent::Submitted => self.submit(),
            FormEvent::SubmissionFinished(result) => {
                self.submission = match result {
                    Ok(()) => SubmissionStatus::Sent,
                    Err(err) => {
                        error!(error = %err, "collection point registration failed");
                        SubmissionStatus::Failed(err.to_string())
                    }
                };
                Vec::new()
            }
        }
    }

    fn mount(&mut self) -> Vec<Effect> {
        if self.mounted {
            return Vec::new();
        }
        self.mounted = true;
        self.categories.start();
        self.states.start();
        vec![Effect::Locate, Effect::LoadCategories, Effect::LoadStates]
    }

    fn select_uf(&mut self, selection: Selection<StateCode>) -> Vec<Effect> {
        if selection == self.selected_uf {
            return Vec::new();
        }
        self.selected_uf = selection;
        // Any response for the previous state is now stale.
        self.city_generation += 1;

        let Selection::Chosen(uf) = &self.selected_uf else {
            self.cities.abandon();
            return Vec::new();
        };
        self.selected_city = Selection::Unset;
        self.cities.start();
        vec![Effect::LoadCities(CityRequest {
            uf: uf.clone(),
            generation: self.city_generation,
        })]
    }

    fn submit(&mut self) -> Vec<Effect> {
        if self.submission == SubmissionStatus::Sending {
            debug!("submission already in flight");
            return Vec::new();
        }
        self.submission = SubmissionStatus::Sending;
        vec![Effect::Submit(self.submission_record())]
    }

    /// Snapshot of the form as it would be posted.
    #[must_use]
    pub fn submission_record(&self) -> SubmissionRecord {
        SubmissionRecord {
            name: self.contact.name.clone(),
            email: self.contact.email.clone(),
            whatsapp: self.contact.whatsapp.clone(),
            uf: self.selected_uf.clone(),
            city: self.selected_city.clone(),
            items: self.selected_items.as_slice().to_vec(),
            latitude: self.selected_position.latitude,
            longitude: self.selected_position.longitude,
        }
    }

    /// State dropdown options, placeholder first.
    #[must_use]
    pub fn uf_options(&self) -> Vec<DropdownOption> {
        dropdown(UF_PLACEHOLDER, self.states.data.iter().map(|uf| uf.0.as_str()))
    }

    /// City dropdown options, placeholder first.
    #[must_use]
    pub fn city_options(&self) -> Vec<DropdownOption> {
        dropdown(
            CITY_PLACEHOLDER,
            self.cities.data.iter().map(|city| city.0.as_str()),
        )
    }

    /// Catalog entries with their selection flag, in catalog order.
    #[must_use]
    pub fn category_entries(&self) -> Vec<CategoryEntry<'_>> {
        self.categories
            .data
            .iter()
            .map(|item| CategoryEntry {
                item,
                selected: self.selected_items.contains(item.id),
            })
            .collect()
    }
}

fn dropdown<'a>(placeholder: &str, values: impl Iterator<Item = &'a str>) -> Vec<DropdownOption> {
    let mut options = vec![DropdownOption {
        value: UNSET_VALUE.to_owned(),
        label: placeholder.to_owned(),
    }];
    options.extend(values.map(|value| DropdownOption {
        value: value.to_owned(),
        label: value.to_owned(),
    }));
    options
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sp() -> StateCode {
        StateCode::from("SP")
    }

    fn load_cities(form: &mut FormState, names: &[&str]) -> CityRequest {
        let effects = form.apply(FormEvent::UfSelected(Selection::Chosen(sp())));
        let [Effect::LoadCities(request)] = effects.as_slice() else {
            panic!("expected a single city fetch, got {effects:?}");
        };
        let request = request.clone();
        form.apply(FormEvent::CitiesLoaded {
            request: request.clone(),
            result: Ok(names.iter().copied().map(CityName::from).collect()),
        });
        request
    }

    #[test]
    fn mount_requests_reference_data_once() {
        let mut form = FormState::new();
        assert_eq!(
            form.apply(FormEvent::Mounted),
            vec![Effect::Locate, Effect::LoadCategories, Effect::LoadStates]
        );
        assert_eq!(form.categories.status, FetchStatus::Loading);
        assert!(form.apply(FormEvent::Mounted).is_empty());
    }

    #[test]
    fn loaded_category_is_listed_unselected() {
        let mut form = FormState::new();
        form.apply(FormEvent::Mounted);
        form.apply(FormEvent::CategoriesLoaded(Ok(vec![CategoryItem {
            id: CategoryId(1),
            title: "Lâmpadas".to_owned(),
            image_url: "x".to_owned(),
        }])));

        let entries = form.category_entries();
        assert_eq!(entries.len(), 1);
        let entry = entries.first().expect("one entry");
        assert_eq!(entry.item.title, "Lâmpadas");
        assert!(!entry.selected);
    }

    #[test]
    fn failed_categories_keep_list_empty_and_record_reason() {
        let mut form = FormState::new();
        form.apply(FormEvent::Mounted);
        form.apply(FormEvent::CategoriesLoaded(Err(PortError::Internal(
            "boom".to_owned(),
        ))));
        form.apply(FormEvent::StatesLoaded(Ok(vec![sp()])));

        assert!(form.category_entries().is_empty());
        assert!(matches!(form.categories.status, FetchStatus::Failed(_)));
        assert_eq!(form.states.status, FetchStatus::Ready);
        assert_eq!(form.uf_options().len(), 2);
    }

    #[test]
    fn city_options_follow_fetch_order() {
        let mut form = FormState::new();
        load_cities(&mut form, &["Campinas", "São Paulo"]);

        let labels: Vec<String> = form
            .city_options()
            .into_iter()
            .map(|option| option.label)
            .collect();
        assert_eq!(labels, ["Selecione uma cidade", "Campinas", "São Paulo"]);
        assert_eq!(
            form.city_options().first().map(|option| option.value.as_str()),
            Some("0")
        );
    }

    #[test]
    fn sentinel_state_never_fetches_or_clears_cities() {
        let mut form = FormState::new();
        load_cities(&mut form, &["Campinas"]);

        assert!(form.apply(FormEvent::UfSelected(Selection::Unset)).is_empty());
        assert_eq!(form.cities.data, vec![CityName::from("Campinas")]);
        assert!(form.apply(FormEvent::UfSelected(Selection::Unset)).is_empty());
        assert_eq!(form.cities.data.len(), 1);
    }

    #[test]
    fn sentinel_state_abandons_city_fetch_in_flight() {
        let mut form = FormState::new();
        let effects = form.apply(FormEvent::UfSelected(Selection::Chosen(sp())));
        let [Effect::LoadCities(request)] = effects.as_slice() else {
            panic!("expected a city fetch, got {effects:?}");
        };
        let request = request.clone();
        assert_eq!(form.cities.status, FetchStatus::Loading);

        assert!(form.apply(FormEvent::UfSelected(Selection::Unset)).is_empty());
        assert_eq!(form.cities.status, FetchStatus::Idle);

        form.apply(FormEvent::CitiesLoaded {
            request,
            result: Ok(vec![CityName::from("Campinas")]),
        });
        assert_eq!(form.cities.status, FetchStatus::Idle);
        assert!(form.cities.data.is_empty());
    }

    #[test]
    fn sentinel_state_keeps_ready_status_of_loaded_cities() {
        let mut form = FormState::new();
        load_cities(&mut form, &["Campinas"]);

        form.apply(FormEvent::UfSelected(Selection::Unset));
        assert_eq!(form.cities.status, FetchStatus::Ready);
    }

    #[test]
    fn reselecting_same_state_does_not_refetch() {
        let mut form = FormState::new();
        load_cities(&mut form, &["Campinas"]);
        assert!(form
            .apply(FormEvent::UfSelected(Selection::Chosen(sp())))
            .is_empty());
    }

    #[test]
    fn stale_city_response_is_ignored() {
        let mut form = FormState::new();
        let effects = form.apply(FormEvent::UfSelected(Selection::Chosen(sp())));
        let [Effect::LoadCities(stale)] = effects.as_slice() else {
            panic!("expected a city fetch");
        };
        let stale = stale.clone();
        form.apply(FormEvent::UfSelected(Selection::Chosen(StateCode::from("RJ"))));

        form.apply(FormEvent::CitiesLoaded {
            request: stale,
            result: Ok(vec![CityName::from("Campinas")]),
        });
        assert!(form.cities.data.is_empty());
        assert_eq!(form.cities.status, FetchStatus::Loading);
    }

    #[test]
    fn failed_city_fetch_keeps_previous_list() {
        let mut form = FormState::new();
        load_cities(&mut form, &["Campinas"]);
        let effects = form.apply(FormEvent::UfSelected(Selection::Chosen(StateCode::from("RJ"))));
        let [Effect::LoadCities(request)] = effects.as_slice() else {
            panic!("expected a city fetch");
        };
        form.apply(FormEvent::CitiesLoaded {
            request: request.clone(),
            result: Err(PortError::Internal("offline".to_owned())),
        });

        assert_eq!(form.cities.data, vec![CityName::from("Campinas")]);
        assert!(matches!(form.cities.status, FetchStatus::Failed(_)));
    }

    #[test]
    fn changing_state_resets_city() {
        let mut form = FormState::new();
        load_cities(&mut form, &["Campinas"]);
        form.apply(FormEvent::CitySelected(Selection::Chosen(CityName::from(
            "Campinas",
        ))));
        form.apply(FormEvent::UfSelected(Selection::Chosen(StateCode::from("RJ"))));
        assert!(form.selected_city.is_unset());
    }

    #[test]
    fn map_click_moves_only_selected_position() {
        let mut form = FormState::new();
        form.apply(FormEvent::LocationResolved(Ok(Coordinate::new(-23.5, -46.6))));
        form.apply(FormEvent::MapClicked(Coordinate::new(-22.9, -47.0)));

        assert_eq!(form.selected_position, Coordinate::new(-22.9, -47.0));
        assert_eq!(form.initial_position, Coordinate::new(-23.5, -46.6));
    }

    #[test]
    fn failed_location_keeps_default_center() {
        let mut form = FormState::new();
        form.apply(FormEvent::LocationResolved(Err(PortError::LocationUnavailable(
            "denied".to_owned(),
        ))));
        assert_eq!(form.initial_position, Coordinate::default());
    }

    #[test]
    fn submit_emits_one_post_with_snapshot() {
        let mut form = FormState::new();
        for (field, value) in [
            (ContactField::Name, "ONG X"),
            (ContactField::Email, "a@b.com"),
            (ContactField::Whatsapp, "1111"),
        ] {
            form.apply(FormEvent::FieldEdited {
                field,
                value: value.to_owned(),
            });
        }
        load_cities(&mut form, &["Campinas"]);
        form.apply(FormEvent::CitySelected(Selection::Chosen(CityName::from(
            "Campinas",
        ))));
        form.apply(FormEvent::CategoryToggled(CategoryId(1)));
        form.apply(FormEvent::CategoryToggled(CategoryId(2)));
        form.apply(FormEvent::MapClicked(Coordinate::new(-22.9, -47.0)));

        let effects = form.apply(FormEvent::Submitted);
        assert_eq!(
            effects,
            vec![Effect::Submit(SubmissionRecord {
                name: "ONG X".to_owned(),
                email: "a@b.com".to_owned(),
                whatsapp: "1111".to_owned(),
                uf: Selection::Chosen(sp()),
                city: Selection::Chosen(CityName::from("Campinas")),
                items: vec![CategoryId(1), CategoryId(2)],
                latitude: -22.9,
                longitude: -47.0,
            })]
        );
        assert!(form.apply(FormEvent::Submitted).is_empty());

        form.apply(FormEvent::SubmissionFinished(Ok(())));
        assert_eq!(form.submission, SubmissionStatus::Sent);
    }

    #[test]
    fn failed_submission_keeps_form_for_another_attempt() {
        let mut form = FormState::new();
        form.apply(FormEvent::FieldEdited {
            field: ContactField::Name,
            value: "ONG X".to_owned(),
        });
        form.apply(FormEvent::Submitted);
        form.apply(FormEvent::SubmissionFinished(Err(PortError::Internal(
            "503".to_owned(),
        ))));

        assert!(matches!(form.submission, SubmissionStatus::Failed(_)));
        assert_eq!(form.contact.name, "ONG X");
        assert_eq!(form.apply(FormEvent::Submitted).len(), 1);
    }

    #[test]
    fn empty_form_submits_sentinels() {
        let mut form = FormState::new();
        let effects = form.apply(FormEvent::Submitted);
        let [Effect::Submit(record)] = effects.as_slice() else {
            panic!("expected a submission");
        };
        assert!(record.has_unset_location());
        assert!(record.items.is_empty());
    }
}
