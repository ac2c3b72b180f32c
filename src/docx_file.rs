use crate::error::{Error, Result};
use docx_rust::{Docx, DocxFile};
use std::path::{Path, PathBuf};

pub struct DocxData {
    /// DocxFile owns the raw package; Docx borrows from it.
    file: DocxFile,
    path: PathBuf,
}

impl DocxData {
    pub fn open(path: &Path) -> Result<Self> {
        let file = DocxFile::from_file(path).map_err(|e| Error::Open {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        Ok(Self {
            file,
            path: path.to_path_buf(),
        })
    }

    pub fn parse(&self) -> Result<Docx<'_>> {
        self.file.parse().map_err(|e| Error::Parse {
            path: self.path.clone(),
            detail: e.to_string(),
        })
    }
}

pub fn write<'a>(docx: &'a mut Docx<'a>, path: &Path) -> Result<()> {
    docx.write_file(path).map_err(|e| Error::Write {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    Ok(())
}
