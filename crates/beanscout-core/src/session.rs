//! Browse session state container.
//!
//! All browse state lives in [`BrowseSession`] and changes only through
//! [`BrowseSession::reduce`], a pure `(state, intent) -> (state', effect)`
//! transition. [`Session`] is the thin runtime that owns the wishlist storage
//! and performs the write-through effect after each transition.
//!
//! Catalog fetches are tagged with a sequence number issued by
//! [`Intent::BeginFetch`]. A result is applied only when its sequence number
//! is newer than the catalog currently shown, so a slow older request can
//! never overwrite a newer one.

use std::collections::BTreeSet;

use crate::products::{CatalogSnapshot, ScoredProduct};
use crate::selection::{SelectionState, Toggle, COMPARISON_CAPACITY};
use crate::storage::{persist_wishlist, restore_wishlist, WishlistStorage};
use crate::view_model::{filter_and_sort, FacetOptions, FilterState, PriceRange, QuickFilter, SortKey};

/// User-visible transient message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ComparisonFull { capacity: usize },
    FetchFailed { message: String },
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Notice::ComparisonFull { capacity } => {
                write!(f, "You can compare up to {capacity} coffees at a time")
            }
            Notice::FetchFailed { message } => write!(f, "Could not load coffees: {message}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    SetPriceRange(PriceRange),
    ToggleRoast(String),
    ToggleOrigin(String),
    ToggleFlavor(String),
    SetSearch(String),
    SetSort(SortKey),
    SetQuickFilter(QuickFilter),
    ResetFilters,
    ToggleWishlist(String),
    ToggleComparison(String),
    BeginFetch,
    FetchSucceeded { seq: u64, catalog: CatalogSnapshot },
    FetchFailed { seq: u64, message: String },
    DismissNotice,
}

/// Side effect requested by a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    PersistWishlist(BTreeSet<String>),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrowseSession {
    pub catalog: Option<CatalogSnapshot>,
    pub filters: FilterState,
    pub selection: SelectionState,
    pub loading: bool,
    pub notice: Option<Notice>,
    /// Sequence number of the most recently issued fetch.
    issued_seq: u64,
    /// Sequence number of the fetch whose catalog is currently shown.
    applied_seq: u64,
}

impl BrowseSession {
    #[must_use]
    pub fn new(filters: FilterState, selection: SelectionState) -> Self {
        Self {
            filters,
            selection,
            ..Self::default()
        }
    }

    /// Sequence number to tag the fetch started by the last [`Intent::BeginFetch`].
    #[must_use]
    pub fn pending_fetch(&self) -> Option<u64> {
        self.loading.then_some(self.issued_seq)
    }

    /// Applies `intent`, returning the next state and any effect to perform.
    #[must_use]
    pub fn reduce(mut self, intent: Intent) -> (Self, Option<Effect>) {
        let mut effect = None;

        match intent {
            Intent::SetPriceRange(range) => self.filters.price_range = range,
            Intent::ToggleRoast(roast) => FilterState::toggle(&mut self.filters.roast_levels, &roast),
            Intent::ToggleOrigin(origin) => FilterState::toggle(&mut self.filters.origins, &origin),
            Intent::ToggleFlavor(flavor) => {
                FilterState::toggle(&mut self.filters.flavor_profiles, &flavor);
            }
            Intent::SetSearch(term) => self.filters.search = term,
            Intent::SetSort(sort) => self.filters.sort = sort,
            Intent::SetQuickFilter(quick) => self.filters.quick = quick,
            Intent::ResetFilters => {
                let price_range = self
                    .catalog
                    .as_ref()
                    .map_or_else(PriceRange::unbounded, |c| PriceRange::covering(&c.products));
                self.filters = FilterState {
                    price_range,
                    ..FilterState::default()
                };
            }
            Intent::ToggleWishlist(id) => {
                self.selection.toggle_wishlist(&id);
                effect = Some(Effect::PersistWishlist(self.selection.wishlist.clone()));
            }
            Intent::ToggleComparison(id) => {
                if self.selection.toggle_comparison(&id) == Toggle::Rejected {
                    tracing::info!(id = %id, "comparison set full; addition rejected");
                    self.notice = Some(Notice::ComparisonFull {
                        capacity: COMPARISON_CAPACITY,
                    });
                }
            }
            Intent::BeginFetch => {
                self.issued_seq += 1;
                self.loading = true;
            }
            Intent::FetchSucceeded { seq, catalog } => {
                if seq > self.applied_seq {
                    self.applied_seq = seq;
                    self.catalog = Some(catalog);
                    if matches!(self.notice, Some(Notice::FetchFailed { .. })) {
                        self.notice = None;
                    }
                } else {
                    tracing::debug!(seq, applied = self.applied_seq, "dropping stale catalog response");
                }
                if seq >= self.issued_seq {
                    self.loading = false;
                }
            }
            Intent::FetchFailed { seq, message } => {
                // Only the newest request decides the failure state; the
                // previously shown catalog stays in place.
                if seq >= self.issued_seq {
                    tracing::warn!(seq, error = %message, "catalog fetch failed; keeping previous catalog");
                    self.loading = false;
                    self.notice = Some(Notice::FetchFailed { message });
                }
            }
            Intent::DismissNotice => self.notice = None,
        }

        (self, effect)
    }

    /// Scored, filtered, sorted products for display. Empty before the first fetch.
    #[must_use]
    pub fn view(&self) -> Vec<ScoredProduct> {
        self.catalog
            .as_ref()
            .map(|c| filter_and_sort(&c.scored(), &self.filters))
            .unwrap_or_default()
    }

    /// Filter control options for the current catalog.
    #[must_use]
    pub fn facets(&self) -> FacetOptions {
        let products = self.catalog.as_ref().map_or(&[][..], |c| &c.products[..]);
        FacetOptions::from_products(products)
    }
}

/// Session runtime: a [`BrowseSession`] plus the durable wishlist backend.
pub struct Session<S> {
    state: BrowseSession,
    storage: S,
}

impl<S: WishlistStorage> Session<S> {
    /// Starts a session, restoring the wishlist from `storage`.
    pub fn start(storage: S, filters: FilterState) -> Self {
        let wishlist = restore_wishlist(&storage);
        tracing::debug!(count = wishlist.len(), "restored wishlist");
        Self {
            state: BrowseSession::new(filters, SelectionState::with_wishlist(wishlist)),
            storage,
        }
    }

    #[must_use]
    pub fn state(&self) -> &BrowseSession {
        &self.state
    }

    /// Runs one transition and performs its effect.
    ///
    /// A failed wishlist write is logged; the in-memory state still reflects
    /// the toggle.
    pub fn dispatch(&mut self, intent: Intent) -> &BrowseSession {
        let (next, effect) = std::mem::take(&mut self.state).reduce(intent);
        self.state = next;

        if let Some(Effect::PersistWishlist(wishlist)) = effect {
            if let Err(e) = persist_wishlist(&self.storage, &wishlist) {
                tracing::error!(error = %e, "failed to persist wishlist");
            }
        }

        &self.state
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
