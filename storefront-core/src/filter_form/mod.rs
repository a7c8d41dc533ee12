//! Headless filter form synchronized with listing URL parameters
//!
//! Every widget change rewrites the query-parameter collection and asks the
//! [`Navigator`] to load the listing for the new URL, so the listing page can
//! always be rendered from the URL alone. The price slider is the exception:
//! its navigation waits for [`SLIDER_DEBOUNCE`] of quiet so dragging does not
//! issue one request per tick.

mod debounce;
mod options;

use tokio::time::Instant;
use tracing::debug;

use crate::filter::keys;
use crate::{DiscountRange, Gender, ProductFilter, QueryParams, ValidationError, LISTING_PATH};

pub use debounce::{Debounce, SLIDER_DEBOUNCE};
pub use options::{
    discount_label, snap_price, FilterOptions, SelectOption, DEFAULT_PRICE, DISCOUNT_CHOICES,
    OCCASIONS, PRICE_MAX, PRICE_MIN, PRICE_STEP,
};

/// A request to show the listing at `url`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub url: String,
    /// Whether the page should scroll to the top
    pub scroll: bool,
}

/// Router seam: receives every navigation the form triggers
pub trait Navigator {
    fn navigate(&mut self, navigation: Navigation);
}

impl Navigator for Vec<Navigation> {
    fn navigate(&mut self, navigation: Navigation) {
        self.push(navigation);
    }
}

impl Navigator for tokio::sync::mpsc::UnboundedSender<Navigation> {
    fn navigate(&mut self, navigation: Navigation) {
        if self.send(navigation).is_err() {
            debug!("navigation receiver dropped");
        }
    }
}

/// Local state of every widget
#[derive(Debug, Clone, PartialEq)]
pub struct FilterState {
    pub brands: Vec<SelectOption<i64>>,
    pub categories: Vec<SelectOption<i64>>,
    pub price: u32,
    /// Slider moved since the last price navigation
    pub slider_changed: bool,
    pub gender: Option<Gender>,
    pub occasions: Vec<SelectOption<String>>,
    pub discount: Option<DiscountRange>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            brands: Vec::new(),
            categories: Vec::new(),
            price: DEFAULT_PRICE,
            slider_changed: false,
            gender: None,
            occasions: Vec::new(),
            discount: None,
        }
    }
}

impl FilterState {
    /// Initial widget state from URL parameters.
    ///
    /// Brand and category ids without a matching option are dropped; values
    /// that fail to parse leave the widget at its default.
    pub fn from_query(params: &QueryParams, options: &FilterOptions) -> Self {
        let brands = params
            .list(keys::BRAND_ID)
            .iter()
            .filter_map(|raw| raw.parse::<i64>().ok())
            .filter_map(|id| options.brand(id).cloned())
            .collect();

        let categories = params
            .list(keys::CATEGORY_ID)
            .iter()
            .filter_map(|raw| raw.parse::<i64>().ok())
            .filter_map(|id| options.category(id).cloned())
            .collect();

        let price = params
            .get(keys::PRICE_RANGE_TO)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .map(snap_price)
            .unwrap_or(DEFAULT_PRICE);

        let gender = params
            .get(keys::GENDER)
            .and_then(|raw| Gender::parse_param(raw).ok())
            .flatten();

        let occasions = params
            .list(keys::OCCASIONS)
            .iter()
            .map(|value| options.occasion(value))
            .collect();

        let discount = params
            .get(keys::DISCOUNT)
            .and_then(|raw| raw.trim().parse::<DiscountRange>().ok());

        Self {
            brands,
            categories,
            price,
            slider_changed: false,
            gender,
            occasions,
            discount,
        }
    }

    /// Label for the discount select.
    pub fn discount_label(&self) -> String {
        discount_label(self.discount)
    }
}

/// Filter form bound to a URL and a navigator
#[derive(Debug)]
pub struct FilterForm<N> {
    options: FilterOptions,
    params: QueryParams,
    state: FilterState,
    slider: Debounce,
    navigator: N,
}

impl<N: Navigator> FilterForm<N> {
    pub fn new(params: QueryParams, options: FilterOptions, navigator: N) -> Self {
        let state = FilterState::from_query(&params, &options);
        Self {
            options,
            params,
            state,
            slider: Debounce::default(),
            navigator,
        }
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    pub fn params(&self) -> &QueryParams {
        &self.params
    }

    pub fn options(&self) -> &FilterOptions {
        &self.options
    }

    pub fn navigator(&self) -> &N {
        &self.navigator
    }

    pub fn into_navigator(self) -> N {
        self.navigator
    }

    /// Listing URL for the current parameters.
    pub fn url(&self) -> String {
        if self.params.is_empty() {
            LISTING_PATH.to_owned()
        } else {
            format!("{}?{}", LISTING_PATH, self.params)
        }
    }

    /// The filter the server will parse from [`Self::url`].
    pub fn filter(&self) -> Result<ProductFilter, ValidationError> {
        ProductFilter::from_query(&self.params)
    }

    /// Brand multi-select changed. Unknown ids are ignored.
    pub fn select_brands(&mut self, ids: &[i64]) {
        let selected: Vec<_> = ids
            .iter()
            .filter_map(|id| self.options.brand(*id).cloned())
            .collect();

        self.params.delete(keys::BRAND_ID);
        for option in &selected {
            self.params.append(keys::BRAND_ID, option.value.to_string());
        }
        self.state.brands = selected;
        self.push(true);
    }

    /// Category multi-select changed. Unknown ids are ignored.
    pub fn select_categories(&mut self, ids: &[i64]) {
        let selected: Vec<_> = ids
            .iter()
            .filter_map(|id| self.options.category(*id).cloned())
            .collect();

        self.params.delete(keys::CATEGORY_ID);
        for option in &selected {
            self.params.append(keys::CATEGORY_ID, option.value.to_string());
        }
        self.state.categories = selected;
        self.push(true);
    }

    /// Slider moved. Navigation is deferred until the slider settles.
    pub fn slide_price(&mut self, value: f64) {
        self.slide_price_at(value, Instant::now());
    }

    pub fn slide_price_at(&mut self, value: f64, now: Instant) {
        self.state.price = snap_price(value);
        self.state.slider_changed = true;
        self.params
            .set(keys::PRICE_RANGE_TO, self.state.price.to_string());
        self.slider.touch(now);
    }

    /// When the pending slider navigation is due, if any.
    pub fn slider_deadline(&self) -> Option<Instant> {
        self.slider.deadline()
    }

    /// Navigate for the slider if its quiet period has elapsed at `now`.
    pub fn flush_slider(&mut self, now: Instant) -> bool {
        if !self.slider.fire(now) || !self.state.slider_changed {
            return false;
        }

        self.params.delete(keys::PAGE);
        self.params.delete(keys::PAGE_SIZE);
        self.params
            .set(keys::PRICE_RANGE_TO, self.state.price.to_string());
        self.state.slider_changed = false;
        self.navigate(false);
        true
    }

    /// Wait out a pending slider debounce and navigate.
    ///
    /// Returns `false` immediately when nothing is pending.
    pub async fn settle(&mut self) -> bool {
        let Some(deadline) = self.slider.deadline() else {
            return false;
        };
        tokio::time::sleep_until(deadline).await;
        self.flush_slider(Instant::now())
    }

    /// Gender radio changed; `None` is the "none" choice.
    pub fn select_gender(&mut self, gender: Option<Gender>) {
        match gender {
            Some(g) => self.params.set(keys::GENDER, g.as_str()),
            None => self.params.delete(keys::GENDER),
        }
        self.state.gender = gender;
        self.push(true);
    }

    /// Occasion multi-select changed.
    pub fn select_occasions<I, S>(&mut self, occasions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut selected: Vec<SelectOption<String>> = Vec::new();
        for occasion in occasions {
            let occasion = occasion.as_ref().trim();
            if occasion.is_empty() || selected.iter().any(|o| o.value == occasion) {
                continue;
            }
            selected.push(self.options.occasion(occasion));
        }

        self.params.delete(keys::OCCASIONS);
        for option in &selected {
            self.params.append(keys::OCCASIONS, option.value.as_str());
        }
        self.state.occasions = selected;
        self.push(true);
    }

    /// Discount select changed; `None` is the "None" entry.
    pub fn select_discount(&mut self, discount: Option<DiscountRange>) {
        match discount {
            Some(range) => self.params.set(keys::DISCOUNT, range.to_string()),
            None => self.params.delete(keys::DISCOUNT),
        }
        self.state.discount = discount;
        self.push(true);
    }

    /// Reset every filter parameter and widget, then navigate once.
    pub fn clear_all(&mut self) {
        for key in keys::FILTERS {
            self.params.delete(key);
        }
        self.params.delete(keys::PAGE);
        self.slider.cancel();
        self.state = FilterState::default();
        self.navigate(true);
    }

    /// Navigation after a filter change: the result set changed, so restart
    /// from the first page.
    fn push(&mut self, scroll: bool) {
        self.params.delete(keys::PAGE);
        self.navigate(scroll);
    }

    fn navigate(&mut self, scroll: bool) {
        let url = self.url();
        debug!(%url, scroll, "filter navigation");
        self.navigator.navigate(Navigation { url, scroll });
    }
}
