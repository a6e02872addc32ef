use pdf_pages_core::{AppConfig, ConversionRun, MupdfRasterizer, Palette};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// One upload and everything converted from it
pub struct Run {
    pub conversion: ConversionRun,
    pub created_at: Instant,
}

/// Global application state
pub struct AppState {
    /// Active runs indexed by UUID
    runs: RwLock<HashMap<Uuid, Run>>,
    pub config: AppConfig,
    pub palette: Palette,
}

impl AppState {
    pub fn new(config: AppConfig) -> anyhow::Result<Self> {
        config.validate()?;
        let palette = Palette::new(config.palette.iter().cloned())?;

        Ok(Self {
            runs: RwLock::new(HashMap::new()),
            config,
            palette,
        })
    }

    pub const fn rasterizer(&self) -> MupdfRasterizer {
        MupdfRasterizer::with_scale(self.config.render_scale)
    }

    /// Store a finished conversion.
    ///
    /// Returns the run ID as a string (for URL embedding).
    pub async fn insert_run(&self, conversion: ConversionRun) -> String {
        let id = Uuid::new_v4();
        let run = Run {
            conversion,
            created_at: Instant::now(),
        };
        self.runs.write().await.insert(id, run);
        id.to_string()
    }

    /// Get a run by ID string.
    ///
    /// Returns `None` if the ID is not a valid UUID or the run doesn't exist.
    pub async fn get_run(&self, id: &str) -> Option<RunRef<'_>> {
        let uuid = Uuid::parse_str(id).ok()?;
        let runs = self.runs.read().await;
        if runs.contains_key(&uuid) {
            Some(RunRef {
                id: uuid,
                state: self,
            })
        } else {
            None
        }
    }

    /// Drop runs older than the configured TTL
    pub async fn cleanup_old_runs(&self) -> usize {
        let max_age = Duration::from_secs(self.config.run_ttl_secs);
        let now = Instant::now();

        let mut runs = self.runs.write().await;
        let before = runs.len();
        runs.retain(|_, run| now.duration_since(run.created_at) < max_age);
        before - runs.len()
    }

    #[cfg(test)]
    pub async fn run_count(&self) -> usize {
        self.runs.read().await.len()
    }
}

/// A borrowed reference to a run.
///
/// Holds only the ID; every access takes the lock inside a synchronous
/// closure, so no guard is ever held across an `.await`.
///
/// ```ignore
/// let (a, b) = run.with_run(|r| (r.field_a.clone(), r.field_b)).await?;
/// do_async_work(a, b).await;
/// ```
pub struct RunRef<'a> {
    id: Uuid,
    state: &'a AppState,
}

impl RunRef<'_> {
    /// Access run data immutably within a closure.
    pub async fn with_run<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&Run) -> R,
    {
        let runs = self.state.runs.read().await;
        runs.get(&self.id).map(f)
    }

    /// Access run data mutably within a closure.
    pub async fn with_run_mut<F, R>(&self, f: F) -> Option<R>
    where
        F: FnOnce(&mut Run) -> R,
    {
        let mut runs = self.state.runs.write().await;
        runs.get_mut(&self.id).map(f)
    }
}
