//! EPUB exporter.
//!
//! Writes the generated documents into a scratch tree
//! (`mimetype`, `META-INF/`, `OEBPS/`) and zips that tree.

use std::collections::HashSet;
use std::fs;
use std::io::{Seek, Write};
use std::path::{Component, Path, PathBuf};

use chrono::NaiveDate;
use tempfile::TempDir;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::import::read_txt;
use crate::model::Book;
use crate::transform::image_sources;
use crate::util::{book_identifier, image_media_type};

use super::archive::{MIMETYPE, archive_tree};
use super::chapter::generate_documents;
use super::ncx::generate_ncx;
use super::opf::{PackageInfo, generate_opf};
use super::{EmptyVolumePolicy, Exporter, NCX_HREF, OPF_HREF, PackageLedger};

/// Configuration for EPUB export.
#[derive(Debug, Clone)]
pub struct EpubConfig {
    /// Compression level for deflate (0-9, default 6).
    pub compression_level: Option<u32>,
    /// `dc:language` of the package.
    pub language: String,
    /// Package identifier. Derived from title and author when unset.
    pub identifier: Option<String>,
    /// `dc:date`. Today's local date when unset.
    pub date: Option<NaiveDate>,
    /// Where to build the scratch tree. When unset a temporary directory is
    /// used and removed afterwards; a given directory is left in place.
    pub work_dir: Option<PathBuf>,
    pub empty_volumes: EmptyVolumePolicy,
    /// Directory that `[img]` sources are resolved against.
    pub asset_root: Option<PathBuf>,
}

impl Default for EpubConfig {
    fn default() -> Self {
        Self {
            compression_level: None,
            language: "zh-CN".to_string(),
            identifier: None,
            date: None,
            work_dir: None,
            empty_volumes: EmptyVolumePolicy::default(),
            asset_root: None,
        }
    }
}

impl EpubConfig {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    pub fn with_empty_volumes(mut self, policy: EmptyVolumePolicy) -> Self {
        self.empty_volumes = policy;
        self
    }

    pub fn with_asset_root(mut self, dir: impl Into<PathBuf>) -> Self {
        self.asset_root = Some(dir.into());
        self
    }

    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = Some(level);
        self
    }
}

/// EPUB 2 exporter.
///
/// # Example
///
/// ```no_run
/// use txt2epub::export::{EpubConfig, EpubExporter, Exporter};
/// use std::fs::File;
///
/// let book = txt2epub::parse_txt("[卷名] 第一卷\n第一章\n　　正文\n");
/// let mut file = File::create("output.epub")?;
/// EpubExporter::new()
///     .with_config(EpubConfig::default().with_language("zh-TW"))
///     .export(&book, &mut file)?;
/// # Ok::<(), txt2epub::Error>(())
/// ```
pub struct EpubExporter {
    config: EpubConfig,
}

impl EpubExporter {
    /// Create a new exporter with default configuration.
    pub fn new() -> Self {
        Self {
            config: EpubConfig::default(),
        }
    }

    /// Configure the exporter with custom settings.
    pub fn with_config(mut self, config: EpubConfig) -> Self {
        self.config = config;
        self
    }

    /// Write the unpacked EPUB tree for `book` under `root`.
    pub fn write_tree(&self, book: &Book, root: &Path) -> Result<()> {
        let oebps = root.join("OEBPS");
        fs::create_dir_all(&oebps)?;
        fs::create_dir_all(root.join("META-INF"))?;

        fs::write(root.join("mimetype"), MIMETYPE)?;
        fs::write(root.join("META-INF").join("container.xml"), CONTAINER_XML)?;

        let mut ledger = PackageLedger::default();
        let documents = generate_documents(book, self.config.empty_volumes, &mut ledger);
        for doc in &documents {
            fs::write(oebps.join(&doc.href), &doc.content)?;
        }

        if let Some(asset_root) = &self.config.asset_root {
            bundle_images(book, asset_root, &oebps, &mut ledger)?;
        }

        let identifier = self
            .config
            .identifier
            .clone()
            .unwrap_or_else(|| book_identifier(&book.metadata.title, &book.metadata.author));
        let date = self
            .config
            .date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
            .format("%Y-%m-%d")
            .to_string();

        let ncx = generate_ncx(book, &identifier, self.config.empty_volumes);
        fs::write(oebps.join(NCX_HREF), ncx)?;

        let info = PackageInfo {
            metadata: &book.metadata,
            identifier: &identifier,
            language: &self.config.language,
            date: &date,
        };
        fs::write(oebps.join(OPF_HREF), generate_opf(&info, &ledger))?;

        debug!(
            documents = documents.len(),
            manifest = ledger.manifest.len(),
            "wrote EPUB tree to {}",
            root.display()
        );
        Ok(())
    }
}

impl Default for EpubExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Exporter for EpubExporter {
    fn export<W: Write + Seek>(&self, book: &Book, writer: &mut W) -> Result<()> {
        let work_dir = WorkDir::prepare(self.config.work_dir.as_deref())?;
        self.write_tree(book, work_dir.path())?;
        archive_tree(work_dir.path(), writer, self.config.compression_level)?;
        Ok(())
    }
}

/// Convert a manuscript file to an EPUB file with default settings.
///
/// Image sources are resolved relative to the manuscript's directory.
pub fn convert<P: AsRef<Path>, Q: AsRef<Path>>(input: P, output: Q) -> Result<()> {
    convert_with_config(input, output, &EpubConfig::default())
}

/// Convert a manuscript file to an EPUB file.
///
/// The archive is written to a temporary file next to `output` and moved
/// into place only once it is complete.
pub fn convert_with_config<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &EpubConfig,
) -> Result<()> {
    let input = input.as_ref();
    let output = output.as_ref();

    let book = read_txt(input)?;

    let mut config = config.clone();
    if config.asset_root.is_none() {
        config.asset_root = Some(parent_dir(input).to_path_buf());
    }

    let mut staged = tempfile::Builder::new()
        .prefix(".txt2epub-")
        .suffix(".epub.part")
        .tempfile_in(parent_dir(output))?;
    EpubExporter::new()
        .with_config(config)
        .export(&book, staged.as_file_mut())?;
    staged.as_file().sync_all()?;
    staged.persist(output)?;

    info!("wrote {}", output.display());
    Ok(())
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

/// Scratch directory for the unpacked tree.
enum WorkDir {
    /// Removed when dropped.
    Temp(TempDir),
    /// Caller-supplied; kept after the run.
    Kept(PathBuf),
}

impl WorkDir {
    fn prepare(dir: Option<&Path>) -> Result<Self> {
        match dir {
            None => Ok(WorkDir::Temp(
                tempfile::Builder::new().prefix("txt2epub-").tempdir()?,
            )),
            Some(dir) => {
                if dir.exists() && fs::read_dir(dir)?.next().is_some() {
                    return Err(Error::WorkDirNotEmpty(dir.to_path_buf()));
                }
                fs::create_dir_all(dir)?;
                Ok(WorkDir::Kept(dir.to_path_buf()))
            }
        }
    }

    fn path(&self) -> &Path {
        match self {
            WorkDir::Temp(dir) => dir.path(),
            WorkDir::Kept(dir) => dir,
        }
    }
}

/// Copy images referenced by `[img]` tags into `oebps` and list them in the
/// manifest. Sources that are URLs, escape the asset root, or are missing
/// are left as plain references.
fn bundle_images(
    book: &Book,
    asset_root: &Path,
    oebps: &Path,
    ledger: &mut PackageLedger,
) -> Result<()> {
    let mut seen = HashSet::new();
    let mut count = 0;

    let sources = book
        .chapters()
        .flat_map(|(_, _, chapter)| chapter.content.iter())
        .flat_map(|line| image_sources(line));

    for src in sources {
        if !seen.insert(src.clone()) || src.contains(':') {
            continue;
        }
        if !is_safe_relative(&src)
            || ledger.contains_href(&src)
            || src == NCX_HREF
            || src == OPF_HREF
        {
            warn!(%src, "image source cannot be bundled");
            continue;
        }

        let source = asset_root.join(&src);
        if !source.is_file() {
            warn!(%src, "image not found under {}", asset_root.display());
            continue;
        }

        let data = fs::read(&source)?;
        let dest = oebps.join(&src);
        if let Some(parent) = dest.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&dest, &data)?;

        count += 1;
        let media_type = image_media_type(&src, &data);
        ledger.add_resource(format!("img{count}"), src.as_str(), media_type);
        debug!(%src, media_type, "bundled image");
    }

    Ok(())
}

/// A non-empty relative path made only of normal components.
fn is_safe_relative(src: &str) -> bool {
    let path = Path::new(src);
    !src.is_empty()
        && !src.contains('\\')
        && path
            .components()
            .all(|c| matches!(c, Component::Normal(_)))
}

/// Container.xml template.
const CONTAINER_XML: &[u8] = br#"<?xml version="1.0" encoding="UTF-8"?>
<container version="1.0" xmlns="urn:oasis:names:tc:opendocument:xmlns:container">
  <rootfiles>
    <rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/>
  </rootfiles>
</container>
"#;
