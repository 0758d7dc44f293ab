use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use async_trait::async_trait;
use tokio::fs;

use crate::{error::AppError, models::trip::Trip};

const TRIPS_DIR: &str = "trips";

/// Document-store seam for trip records. Handlers only see this trait,
/// so tests can swap in a store rooted anywhere (e.g. a temp dir).
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn find_all(&self) -> Result<Vec<Trip>, AppError>;
    async fn find_one(&self, id: &str) -> Result<Option<Trip>, AppError>;
    async fn insert(&self, trip: &Trip) -> Result<(), AppError>;
    async fn replace(&self, id: &str, trip: &Trip) -> Result<(), AppError>;
    /// Returns false when no document with that id existed.
    async fn delete(&self, id: &str) -> Result<bool, AppError>;
    /// Case-insensitive substring match over attraction, city, and
    /// country; first hit wins.
    async fn search(&self, query: &str) -> Result<Option<Trip>, AppError>;
}

/// One JSON document per trip under `<root>/trips/<id>.json`.
#[derive(Clone)]
pub struct JsonTripStore {
    root: Arc<PathBuf>,
}

impl JsonTripStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_structure(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.trips_dir()).await?;
        Ok(())
    }

    fn trips_dir(&self) -> PathBuf {
        self.root().join(TRIPS_DIR)
    }

    fn trip_path(&self, id: &str) -> Option<PathBuf> {
        // Ids are generated as hex; anything else never names a document.
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return None;
        }
        Some(self.trips_dir().join(format!("{id}.json")))
    }

    async fn write_trip(&self, trip: &Trip) -> Result<(), AppError> {
        let path = self
            .trip_path(&trip.id)
            .ok_or_else(|| AppError::BadRequest(format!("invalid trip id: {}", trip.id)))?;
        let data = serde_json::to_vec_pretty(trip).map_err(|err| AppError::Other(err.into()))?;
        fs::write(path, data).await?;
        Ok(())
    }
}

#[async_trait]
impl TripStore for JsonTripStore {
    async fn find_all(&self) -> Result<Vec<Trip>, AppError> {
        let mut trips = Vec::new();
        let dir = self.trips_dir();
        if !fs::try_exists(&dir).await? {
            return Ok(trips);
        }
        let mut entries = fs::read_dir(&dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let raw = fs::read(&path).await?;
            let trip: Trip =
                serde_json::from_slice(&raw).map_err(|err| AppError::Other(err.into()))?;
            trips.push(trip);
        }
        Ok(trips)
    }

    async fn find_one(&self, id: &str) -> Result<Option<Trip>, AppError> {
        let Some(path) = self.trip_path(id) else {
            return Ok(None);
        };
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        let raw = fs::read(&path).await?;
        let trip: Trip = serde_json::from_slice(&raw).map_err(|err| AppError::Other(err.into()))?;
        Ok(Some(trip))
    }

    async fn insert(&self, trip: &Trip) -> Result<(), AppError> {
        self.write_trip(trip).await
    }

    async fn replace(&self, id: &str, trip: &Trip) -> Result<(), AppError> {
        debug_assert_eq!(id, trip.id);
        self.write_trip(trip).await
    }

    async fn delete(&self, id: &str) -> Result<bool, AppError> {
        let Some(path) = self.trip_path(id) else {
            return Ok(false);
        };
        if !fs::try_exists(&path).await? {
            return Ok(false);
        }
        fs::remove_file(path).await?;
        Ok(true)
    }

    async fn search(&self, query: &str) -> Result<Option<Trip>, AppError> {
        let needle = query.to_lowercase();
        let hit = self.find_all().await?.into_iter().find(|trip| {
            trip.attraction.to_lowercase().contains(&needle)
                || trip.city.to_lowercase().contains(&needle)
                || trip.country.to_lowercase().contains(&needle)
        });
        Ok(hit)
    }
}
