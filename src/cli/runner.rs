//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, OutputFormat};
use crate::cli::replay::{load_fixture, Fixture, ReplayError};
use crate::descriptor::{load_descriptor, PageDescriptor};
use crate::error::{Error, Result, ResultExt};
use crate::json::{JsonRequest, JsonResponse};
use crate::pagination::PagedSequence;
use crate::types::JsonValue;
use serde::Serialize;
use serde_json::json;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command, writing results to stdout
    pub fn run(&self) -> Result<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_to(&mut out)
    }

    /// Run the CLI command, writing results to `out`
    pub fn run_to(&self, out: &mut impl Write) -> Result<()> {
        match &self.cli.command {
            Commands::List { fixture, max_items } => self.list(out, fixture, *max_items),
            Commands::Pages { fixture } => self.pages(out, fixture),
            Commands::Validate => self.validate(out),
        }
    }

    /// Load page descriptor
    fn load_descriptor(&self) -> Result<Arc<PageDescriptor>> {
        let path = self
            .cli
            .descriptor
            .as_ref()
            .ok_or_else(|| Error::config("Descriptor file not specified (use -d flag)"))?;
        Ok(Arc::new(load_descriptor(path)?))
    }

    /// Print every item of a recorded listing
    fn list(&self, out: &mut impl Write, fixture: &Path, max_items: Option<usize>) -> Result<()> {
        let descriptor = self.load_descriptor()?;
        let fixture = read_fixture(fixture)?;
        let mut items = replay_sequence(&descriptor, &fixture)?;

        let mut printed = 0usize;
        while max_items.map_or(true, |max| printed < max) {
            let Some(item) = items.next_item()? else {
                break;
            };
            self.emit(out, &item)?;
            printed += 1;
        }

        info!(
            items = printed,
            pages = items.stats().pages_fetched,
            "Listing complete"
        );
        Ok(())
    }

    /// Print one summary per page
    fn pages(&self, out: &mut impl Write, fixture: &Path) -> Result<()> {
        let descriptor = self.load_descriptor()?;
        let fixture = read_fixture(fixture)?;
        let pages = replay_sequence(&descriptor, &fixture)?.into_pages();

        for (index, page) in pages.enumerate() {
            let page = page?;
            match self.cli.format {
                OutputFormat::Json => self.emit(
                    out,
                    &json!({
                        "page": index,
                        "items": page.len(),
                        "next_page_token": page.next_page_token(),
                    }),
                )?,
                OutputFormat::Pretty => writeln!(
                    out,
                    "page {index}: {} items, next token {}",
                    page.len(),
                    page.next_page_token().unwrap_or("-")
                )?,
            }
        }
        Ok(())
    }

    /// Validate descriptor
    fn validate(&self, out: &mut impl Write) -> Result<()> {
        let descriptor = self.load_descriptor()?;
        self.emit(out, descriptor.as_ref())?;
        info!("Descriptor is valid");
        Ok(())
    }

    /// Write a value in the selected output format
    fn emit<T: Serialize + ?Sized>(&self, out: &mut impl Write, value: &T) -> Result<()> {
        let text = match self.cli.format {
            OutputFormat::Json => serde_json::to_string(value)?,
            OutputFormat::Pretty => serde_json::to_string_pretty(value)?,
        };
        writeln!(out, "{text}")?;
        Ok(())
    }
}

fn read_fixture(path: &Path) -> Result<Fixture> {
    load_fixture(path).with_context(|| format!("Failed to load fixture {}", path.display()))
}

/// Sequence over a fixture's recorded pages
fn replay_sequence<'a>(
    descriptor: &'a Arc<PageDescriptor>,
    fixture: &'a Fixture,
) -> Result<
    PagedSequence<
        JsonRequest,
        JsonResponse,
        impl FnMut(&JsonRequest) -> std::result::Result<JsonResponse, ReplayError> + 'a,
    >,
> {
    let request = JsonRequest::new(Arc::clone(descriptor), fixture.request.clone())?;
    Ok(PagedSequence::new(request, move |request: &JsonRequest| {
        fixture
            .respond(request)
            .map(|body: JsonValue| JsonResponse::<JsonValue>::new(Arc::clone(descriptor), body))
    }))
}
