//! Topic in, MP4 out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::compose::sequence::{SequenceComposer, SkippedImage};
use crate::config::Config;
use crate::foundation::error::{DegradedFeature, HerodoError, HerodoResult};
use crate::narration::tts::{Narration, Narrator};
use crate::render::pipeline::RenderStats;
use crate::research::wikipedia::{ArticleSource, WikipediaResearcher};
use crate::script::{Script, generate_script};
use crate::timeline::job::RenderJob;
use crate::timeline::sync::{SyncAction, TimelineSynchronizer};

/// Summary of a finished render.
#[derive(Clone, Debug, serde::Serialize)]
pub struct RenderReport {
    pub output: PathBuf,
    pub title: String,
    pub script: String,
    pub duration_secs: f64,
    pub images_found: usize,
    pub clips_rendered: usize,
    pub images_skipped: Vec<SkippedImage>,
    pub sync: SyncAction,
    pub stats: RenderStats,
    pub warnings: Vec<DegradedFeature>,
}

/// Everything decided before encoding starts.
#[derive(Debug)]
pub struct PlannedRender {
    pub title: String,
    pub script: Script,
    pub narration: Narration,
    pub images_found: usize,
    pub clips_rendered: usize,
    pub images_skipped: Vec<SkippedImage>,
    pub job: RenderJob,
}

impl PlannedRender {
    /// All non-fatal fallbacks, narration first.
    pub fn warnings(&self) -> Vec<DegradedFeature> {
        self.narration
            .warning
            .iter()
            .chain(self.job.warnings())
            .cloned()
            .collect()
    }

    pub fn into_report(self, stats: RenderStats) -> RenderReport {
        let warnings = self.warnings();
        RenderReport {
            output: self.job.output_path().to_path_buf(),
            title: self.title,
            script: self.script.text,
            duration_secs: self.job.duration_secs(),
            images_found: self.images_found,
            clips_rendered: self.clips_rendered,
            images_skipped: self.images_skipped,
            sync: self.job.sync_action(),
            stats,
            warnings,
        }
    }
}

/// research → script → narration → compose → synchronize → encode.
pub struct Pipeline {
    cfg: Config,
    research: Box<dyn ArticleSource>,
    narrator: Narrator,
    composer: SequenceComposer,
    synchronizer: TimelineSynchronizer,
}

impl Pipeline {
    /// Pipeline backed by Wikipedia, `edge-tts` and the system `ffmpeg`.
    pub fn new(cfg: Config) -> HerodoResult<Self> {
        let research = Box::new(WikipediaResearcher::new(&cfg.research)?);
        let narrator = Narrator::new(&cfg);
        let synchronizer = TimelineSynchronizer::new(&cfg);
        Ok(Self::with_parts(cfg, research, narrator, synchronizer))
    }

    pub fn with_parts(
        cfg: Config,
        research: Box<dyn ArticleSource>,
        narrator: Narrator,
        synchronizer: TimelineSynchronizer,
    ) -> Self {
        Self {
            composer: SequenceComposer::new(&cfg),
            cfg,
            research,
            narrator,
            synchronizer,
        }
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Run every stage up to, but not including, the encode.
    #[tracing::instrument(skip_all, fields(topic = %topic))]
    pub fn plan(
        &self,
        topic: &str,
        output: &Path,
        background_music: Option<&Path>,
    ) -> HerodoResult<PlannedRender> {
        tracing::info!("step 1: fetching article");
        let bundle = self.research.research(topic)?;
        if bundle.image_paths.is_empty() {
            return Err(HerodoError::empty_input(format!(
                "no valid images found for '{}'",
                bundle.title
            )));
        }
        tracing::info!(images = bundle.image_paths.len(), "found images");

        tracing::info!("step 2: generating script");
        let script = generate_script(&bundle.summary, self.cfg.narration.max_sentences)?;

        tracing::info!("step 3: generating narration");
        let narration = self.narrator.narrate(&script.text)?;

        tracing::info!(
            duration = narration.duration_secs,
            "step 4: animating images"
        );
        let mut rng = match self.cfg.sequence.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let sequence =
            self.composer
                .compose(&bundle.image_paths, narration.duration_secs, &mut rng)?;
        let clips_rendered = sequence.clips().len();
        let images_skipped = sequence.skipped().to_vec();

        tracing::info!("step 5: synchronizing timeline");
        let track = self.synchronizer.load_narration(&narration.path)?;
        let job = self.synchronizer.synchronize(
            Arc::new(sequence),
            track,
            output,
            background_music,
        )?;

        Ok(PlannedRender {
            title: bundle.title,
            script,
            narration,
            images_found: bundle.image_paths.len(),
            clips_rendered,
            images_skipped,
            job,
        })
    }

    /// Produce the finished video at `output`.
    pub fn run(
        &self,
        topic: &str,
        output: &Path,
        background_music: Option<&Path>,
    ) -> HerodoResult<RenderReport> {
        let planned = self.plan(topic, output, background_music)?;
        tracing::info!("step 6: encoding");
        let stats = planned.job.run()?;
        let report = planned.into_report(stats);
        tracing::info!(output = %report.output.display(), "pipeline complete");
        Ok(report)
    }
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
