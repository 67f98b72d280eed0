use ecoleta_core::{
    form::{DropdownOption, Effect, FormEvent, FormState, SubmissionStatus},
    map::{Viewport, nudge},
    model::{Coordinate, Selection, UNSET_VALUE},
};
use ratatui::layout::Rect;

/// Notice shown once the backend accepted the registration.
pub(crate) const CREATED_NOTICE: &str = "Ponto de coleta criado";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Screen {
    /// Landing screen, the "/" route.
    Home,
    Register,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Focus {
    Name,
    Email,
    Whatsapp,
    Map,
    Uf,
    City,
    Items,
    Submit,
}

const FOCUS_ORDER: [Focus; 8] = [
    Focus::Name,
    Focus::Email,
    Focus::Whatsapp,
    Focus::Map,
    Focus::Uf,
    Focus::City,
    Focus::Items,
    Focus::Submit,
];

impl Focus {
    pub(crate) fn next(self) -> Self {
        let idx = FOCUS_ORDER.iter().position(|focus| *focus == self).unwrap_or(0);
        FOCUS_ORDER
            .get((idx + 1) % FOCUS_ORDER.len())
            .copied()
            .unwrap_or(Focus::Name)
    }

    pub(crate) fn previous(self) -> Self {
        let idx = FOCUS_ORDER.iter().position(|focus| *focus == self).unwrap_or(0);
        FOCUS_ORDER
            .get((idx + FOCUS_ORDER.len() - 1) % FOCUS_ORDER.len())
            .copied()
            .unwrap_or(Focus::Name)
    }

    pub(crate) fn is_text(self) -> bool {
        matches!(self, Focus::Name | Focus::Email | Focus::Whatsapp)
    }
}

pub(crate) struct App {
    pub screen: Screen,
    pub form: FormState,
    pub focus: Focus,
    pub item_index: usize,
    /// Crosshair for picking a position with the keyboard.
    pub cursor: Coordinate,
    pub map_zoom: u8,
    /// Inner area of the map widget as last laid out.
    pub map_area: Rect,
    /// Identifies the current registration form; completions from older forms are dropped.
    pub session: u64,
}

impl App {
    pub(crate) fn new(map_zoom: u8) -> Self {
        Self {
            screen: Screen::Home,
            form: FormState::new(),
            focus: Focus::Name,
            item_index: 0,
            cursor: Coordinate::default(),
            map_zoom,
            map_area: Rect::default(),
            session: 0,
        }
    }

    /// Open a fresh registration form and return its mount effects.
    pub(crate) fn open_register(&mut self) -> Vec<Effect> {
        self.session += 1;
        self.screen = Screen::Register;
        self.form = FormState::new();
        self.focus = Focus::Name;
        self.item_index = 0;
        self.cursor = Coordinate::default();
        self.form.apply(FormEvent::Mounted)
    }

    pub(crate) fn go_home(&mut self) {
        self.screen = Screen::Home;
        self.form = FormState::new();
    }

    pub(crate) fn handle(&mut self, event: FormEvent) -> Vec<Effect> {
        if let FormEvent::LocationResolved(Ok(position)) = &event {
            self.cursor = *position;
        }
        let effects = self.form.apply(event);
        let count = self.form.categories.data.len();
        if self.item_index >= count {
            self.item_index = count.saturating_sub(1);
        }
        effects
    }

    pub(crate) fn notice(&self) -> Option<&'static str> {
        (self.form.submission == SubmissionStatus::Sent).then_some(CREATED_NOTICE)
    }

    pub(crate) fn viewport(&self) -> Viewport {
        Viewport::new(self.form.initial_position, self.map_zoom)
    }

    pub(crate) fn move_cursor(&mut self, rows: i32, columns: i32) {
        let cell = self
            .viewport()
            .cell_size(self.map_area.width, self.map_area.height);
        self.cursor = nudge(self.cursor, cell, rows, columns);
    }

    /// Coordinate under a terminal cell, if the cell is inside the map.
    pub(crate) fn map_coordinate_at(&self, column: u16, row: u16) -> Option<Coordinate> {
        let area = self.map_area;
        let inside = column >= area.x
            && column < area.x + area.width
            && row >= area.y
            && row < area.y + area.height;
        inside.then(|| {
            self.viewport()
                .coordinate_at(column - area.x, row - area.y, area.width, area.height)
        })
    }

    pub(crate) fn uf_index(&self) -> usize {
        let value = self
            .form
            .selected_uf
            .chosen()
            .map_or(UNSET_VALUE, |uf| uf.0.as_str());
        option_index(&self.form.uf_options(), value)
    }

    pub(crate) fn city_index(&self) -> usize {
        let value = self
            .form
            .selected_city
            .chosen()
            .map_or(UNSET_VALUE, |city| city.0.as_str());
        option_index(&self.form.city_options(), value)
    }

    /// Event selecting the state `step` options away from the current one.
    pub(crate) fn step_uf(&self, step: isize) -> Option<FormEvent> {
        let options = self.form.uf_options();
        let option = stepped(&options, self.uf_index(), step)?;
        Some(FormEvent::UfSelected(Selection::from_value(&option.value)))
    }

    /// Event selecting the city `step` options away from the current one.
    pub(crate) fn step_city(&self, step: isize) -> Option<FormEvent> {
        let options = self.form.city_options();
        let option = stepped(&options, self.city_index(), step)?;
        Some(FormEvent::CitySelected(Selection::from_value(&option.value)))
    }
}

fn option_index(options: &[DropdownOption], value: &str) -> usize {
    options
        .iter()
        .position(|option| option.value == value)
        .unwrap_or(0)
}

fn stepped(options: &[DropdownOption], current: usize, step: isize) -> Option<&DropdownOption> {
    let target = current.checked_add_signed(step)?;
    if target == current {
        return None;
    }
    options.get(target)
}
