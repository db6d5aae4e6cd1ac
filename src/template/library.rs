//! The persisted template collection

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::asset::AssetResolver;
use crate::confirm::{Choice, ConfirmProvider};
use crate::document::{self, LoadWarning};
use crate::error::DocumentError;
use crate::template::Template;

/// Errors from library persistence
#[derive(Debug, Error)]
pub enum LibraryError {
    /// The backing store could not be read
    #[error("failed to read library store {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing store could not be written
    #[error("failed to write library store {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The backing store exists but is not a valid library document
    #[error(transparent)]
    Document(#[from] DocumentError),
}

/// What happened to an [`TemplateLibrary::add`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    /// The template was new and was inserted
    Inserted,
    /// An existing template at the same path was replaced
    Replaced,
    /// The user declined to overwrite; the library is unchanged
    Cancelled,
}

/// The collection of all templates, bound to one backing store file.
///
/// One library instance serves one editing session. Every mutating operation
/// writes through to the store before returning, and writes go to a temporary
/// file that replaces the store atomically, so a failure mid-write leaves the
/// previous valid document in place.
pub struct TemplateLibrary {
    templates: Vec<Template>,
    store_path: PathBuf,
    assets: Box<dyn AssetResolver>,
    confirm: Box<dyn ConfirmProvider>,
    warnings: Vec<LoadWarning>,
}

impl std::fmt::Debug for TemplateLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateLibrary")
            .field("templates", &self.templates)
            .field("store_path", &self.store_path)
            .field("assets", &"<dyn AssetResolver>")
            .field("confirm", &"<dyn ConfirmProvider>")
            .field("warnings", &self.warnings)
            .finish()
    }
}

impl TemplateLibrary {
    /// Open the library at `store_path`, creating an empty store if none
    /// exists yet.
    ///
    /// A missing store is bootstrapped; a present but malformed one is a
    /// fatal [`LibraryError::Document`].
    pub fn open(
        store_path: impl Into<PathBuf>,
        assets: Box<dyn AssetResolver>,
        confirm: Box<dyn ConfirmProvider>,
    ) -> Result<Self, LibraryError> {
        let mut library = Self {
            templates: Vec::new(),
            store_path: store_path.into(),
            assets,
            confirm,
            warnings: Vec::new(),
        };
        if !library.store_path.exists() {
            log::info!(
                "library store {} does not exist, bootstrapping an empty one",
                library.store_path.display()
            );
            library.save()?;
        }
        library.reload()?;
        Ok(library)
    }

    /// Replace the in-memory state with the store's current contents.
    ///
    /// Per-item problems are logged, kept in [`Self::load_warnings`], and do
    /// not fail the reload.
    pub fn reload(&mut self) -> Result<(), LibraryError> {
        let source = fs::read_to_string(&self.store_path).map_err(|source| LibraryError::Read {
            path: self.store_path.clone(),
            source,
        })?;
        let parsed = document::parse_document(&source, self.assets.as_ref())?;
        for warning in &parsed.warnings {
            log::warn!("{}: {warning}", self.store_path.display());
        }
        self.templates = parsed.templates;
        self.warnings = parsed.warnings;
        Ok(())
    }

    /// Write the whole library to the backing store
    pub fn save(&self) -> Result<(), LibraryError> {
        let xml = document::write_document(&self.templates, self.assets.as_ref())?;
        let staging = self.store_path.with_extension("tmp");
        let write_err = |source| LibraryError::Write {
            path: self.store_path.clone(),
            source,
        };
        fs::write(&staging, xml).map_err(write_err)?;
        fs::rename(&staging, &self.store_path).map_err(write_err)?;
        Ok(())
    }

    /// Register a template and persist.
    ///
    /// A path collision asks the confirmation capability whether to
    /// overwrite; declining leaves both the library and the store untouched.
    pub fn add(&mut self, template: Template) -> Result<AddOutcome, LibraryError> {
        let path = template.path();
        let outcome = match self.templates.iter().position(|t| t.path() == path) {
            Some(index) => {
                let choice = self.confirm.confirm(
                    "Template Already Exists",
                    &format!("Template '{path}' already exists. Overwrite?"),
                    "Overwrite",
                    "Cancel",
                );
                if choice == Choice::Alternative {
                    return Ok(AddOutcome::Cancelled);
                }
                self.templates.remove(index);
                self.templates.push(template);
                AddOutcome::Replaced
            }
            None => {
                self.templates.push(template);
                AddOutcome::Inserted
            }
        };
        self.save()?;
        Ok(outcome)
    }

    /// Remove the template at `path` and persist.
    ///
    /// Returns whether a template was removed; an absent path is a no-op and
    /// does not touch the store.
    pub fn delete(&mut self, path: &str) -> Result<bool, LibraryError> {
        match self.templates.iter().position(|t| t.path() == path) {
            Some(index) => {
                self.templates.remove(index);
                self.save()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Look up a template by its `category/name` path
    pub fn get(&self, path: &str) -> Option<&Template> {
        self.templates.iter().find(|t| t.path() == path)
    }

    /// All templates in store order
    pub fn templates(&self) -> &[Template] {
        &self.templates
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Warnings collected by the most recent load
    pub fn load_warnings(&self) -> &[LoadWarning] {
        &self.warnings
    }

    /// The backing store location
    pub fn store_path(&self) -> &Path {
        &self.store_path
    }
}
