//! Recording use-cases shared by the carousel screens.
//!
//! # Responsibility
//! - Load carousel items for the emotion, location and feed screens.
//! - Collect recorded dates for the week strip.
//! - Keep screens in sync after a recording is deleted.
//!
//! # Invariants
//! - The service never bypasses repository validation.
//! - The service stays storage-agnostic.

use crate::calendar::week::WeekWindow;
use crate::model::item::{Emotion, Item, ItemId};
use crate::repo::item_repo::{ItemQuery, ItemRepository, RepoResult, ViewPeriod};
use crate::service::archive::{summarize, ArchiveSummary};
use chrono::NaiveDate;
use log::info;
use std::collections::BTreeSet;

/// Use-case wrapper over an item repository.
pub struct ItemService<R: ItemRepository> {
    repo: R,
}

impl<R: ItemRepository> ItemService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn record(&self, item: &Item) -> RepoResult<ItemId> {
        self.repo.insert_item(item)
    }

    pub fn get(&self, id: ItemId) -> RepoResult<Option<Item>> {
        self.repo.get_item(id)
    }

    /// Items matching an arbitrary filter, in carousel order.
    pub fn items(&self, query: &ItemQuery) -> RepoResult<Vec<Item>> {
        self.repo.fetch_items(query)
    }

    pub fn delete(&self, id: ItemId) -> RepoResult<()> {
        self.repo.delete_item(id)
    }

    /// Items of the emotion detail carousel.
    pub fn emotion_items(&self, emotion: Emotion, period: ViewPeriod) -> RepoResult<Vec<Item>> {
        self.repo
            .fetch_items(&ItemQuery::for_emotion(emotion).with_period(period))
    }

    /// Items of the location detail carousel.
    pub fn district_items(&self, district: &str, period: ViewPeriod) -> RepoResult<Vec<Item>> {
        self.repo
            .fetch_items(&ItemQuery::for_district(district).with_period(period))
    }

    /// Items of the feed carousel for the selected day.
    pub fn items_on(&self, date: NaiveDate) -> RepoResult<Vec<Item>> {
        let items = self
            .repo
            .fetch_items(&ItemQuery::all().with_period(ViewPeriod::month_of(date)))?;
        Ok(items
            .into_iter()
            .filter(|item| item.recorded_on() == date)
            .collect())
    }

    /// Days inside `window` that have at least one recording.
    pub fn recorded_dates(&self, window: &WeekWindow) -> RepoResult<BTreeSet<NaiveDate>> {
        let days = window.days();
        let mut periods = days
            .iter()
            .map(|day| ViewPeriod::month_of(*day))
            .collect::<Vec<_>>();
        periods.dedup();

        let mut dates = BTreeSet::new();
        for period in periods {
            for item in self.repo.fetch_items(&ItemQuery::all().with_period(period))? {
                if window.contains(item.recorded_on()) {
                    dates.insert(item.recorded_on());
                }
            }
        }
        Ok(dates)
    }

    pub fn archive_summary(&self, period: ViewPeriod) -> RepoResult<ArchiveSummary> {
        let items = self
            .repo
            .fetch_items(&ItemQuery::all().with_period(period))?;
        let summary = summarize(&items, period);
        info!(
            "event=archive_summary module=service status=ok total={} districts={}",
            summary.total_records,
            summary.district_counts.len()
        );
        Ok(summary)
    }

    /// Deletes `id` and returns the refreshed carousel items for `query`.
    pub fn delete_and_reload(&self, id: ItemId, query: &ItemQuery) -> RepoResult<Vec<Item>> {
        self.repo.delete_item(id)?;
        self.repo.fetch_items(query)
    }
}
