//! Save/load API for `.lmprj` project files.

use crate::chunk::{
    TAG_AUDN, TAG_CLIP, TAG_FILT, TAG_FPS, TAG_IMPT, TAG_NAME, TAG_OUTP, TAG_OVER, TAG_PROJ,
    TAG_RESO, read_chunk, tag_name, write_chunk,
};
use crate::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use platform_dirs::AppDirs;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use timeline::Project;

pub const EXTENSION: &str = ".lmprj";

const APP_NAME: &str = "seqcut";
const FORMAT_VERSION: &str = "0.0.1";

/// Platform data directory holding saved projects, created on demand.
pub fn save_dir() -> Result<PathBuf> {
    let dirs = AppDirs::new(Some(APP_NAME), false).ok_or(Error::NoDataDir)?;
    fs::create_dir_all(&dirs.data_dir)?;
    Ok(dirs.data_dir)
}

/// Save under the platform data directory; appends the extension when
/// missing. Returns the full path written.
pub fn save(project: &Project, filename: &str) -> Result<PathBuf> {
    let mut filename = filename.to_string();
    if !filename.ends_with(EXTENSION) {
        filename.push_str(EXTENSION);
    }
    let path = save_dir()?.join(filename);
    save_to(&path, project)?;
    Ok(path)
}

/// Load a project from the platform data directory.
pub fn load(filename: &str) -> Result<Project> {
    let path = save_dir()?.join(filename);
    if !path.exists() {
        return Err(Error::NotFound(filename.to_string()));
    }
    load_from(&path)
}

/// Write the whole project as a chunk stream to `path`.
pub fn save_to(path: impl AsRef<Path>, project: &Project) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);

    let meta = serde_json::json!({
        "version": FORMAT_VERSION,
        "name": project.name,
    });
    write_chunk(&mut writer, TAG_PROJ, &serde_json::to_vec(&meta)?)?;

    let mut reso = Vec::with_capacity(8);
    reso.write_u32::<LittleEndian>(project.resolution.0)?;
    reso.write_u32::<LittleEndian>(project.resolution.1)?;
    write_chunk(&mut writer, TAG_RESO, &reso)?;

    let mut fps = Vec::with_capacity(4);
    fps.write_f32::<LittleEndian>(project.fps)?;
    write_chunk(&mut writer, TAG_FPS, &fps)?;

    write_chunk(&mut writer, TAG_OUTP, project.output.as_bytes())?;
    write_chunk(&mut writer, TAG_AUDN, &[project.audio_normalize as u8])?;
    write_chunk(&mut writer, TAG_FILT, &serde_json::to_vec(&project.filters)?)?;

    if !project.imported_assets.is_empty() {
        write_chunk(
            &mut writer,
            TAG_IMPT,
            &serde_json::to_vec(&project.imported_assets)?,
        )?;
    }

    for clip in &project.clips {
        write_chunk(&mut writer, TAG_CLIP, &serde_json::to_vec(clip)?)?;
    }
    for overlay in &project.text_overlays {
        write_chunk(&mut writer, TAG_OVER, &serde_json::to_vec(overlay)?)?;
    }

    Ok(())
}

/// Read a chunk stream back into a [`Project`].
///
/// Unknown tags are skipped; a chunk whose payload fails to decode is
/// logged and skipped, keeping the rest of the file.
pub fn load_from(path: impl AsRef<Path>) -> Result<Project> {
    let mut reader = BufReader::new(File::open(path.as_ref())?);
    let mut project = Project::default();

    while let Some((tag, payload)) = read_chunk(&mut reader)? {
        let applied = match tag {
            TAG_PROJ => apply_meta(&mut project, &payload),
            TAG_NAME => {
                // Bare-UTF-8 dialect of the project name.
                project.name = String::from_utf8_lossy(&payload).into_owned();
                true
            }
            TAG_RESO => apply_resolution(&mut project, &payload),
            TAG_FPS => apply_fps(&mut project, &payload),
            TAG_OUTP => {
                project.output = String::from_utf8_lossy(&payload).into_owned();
                true
            }
            TAG_AUDN => {
                project.audio_normalize = payload.first().is_some_and(|&b| b != 0);
                true
            }
            TAG_FILT => match serde_json::from_slice(&payload) {
                Ok(filters) => {
                    project.filters = filters;
                    true
                }
                Err(_) => false,
            },
            TAG_IMPT => match serde_json::from_slice(&payload) {
                Ok(assets) => {
                    project.imported_assets = assets;
                    true
                }
                Err(_) => false,
            },
            TAG_CLIP => match serde_json::from_slice(&payload) {
                Ok(clip) => {
                    project.clips.push(clip);
                    true
                }
                Err(_) => false,
            },
            TAG_OVER => match serde_json::from_slice(&payload) {
                Ok(overlay) => {
                    project.text_overlays.push(overlay);
                    true
                }
                Err(_) => false,
            },
            _ => {
                log::debug!("skipping unknown chunk {}", tag_name(tag));
                true
            }
        };

        if !applied {
            log::warn!("skipping malformed {} chunk", tag_name(tag));
        }
    }

    Ok(project)
}

fn apply_meta(project: &mut Project, payload: &[u8]) -> bool {
    let Ok(meta) = serde_json::from_slice::<serde_json::Value>(payload) else {
        return false;
    };
    if let Some(name) = meta.get("name").and_then(|v| v.as_str()) {
        project.name = name.to_string();
    }
    true
}

fn apply_resolution(project: &mut Project, payload: &[u8]) -> bool {
    let mut cursor = payload;
    let (Ok(width), Ok(height)) = (
        cursor.read_u32::<LittleEndian>(),
        cursor.read_u32::<LittleEndian>(),
    ) else {
        return false;
    };
    project.set_resolution(width, height)
}

fn apply_fps(project: &mut Project, payload: &[u8]) -> bool {
    let mut cursor = payload;
    let Ok(fps) = cursor.read_f32::<LittleEndian>() else {
        return false;
    };
    project.set_fps(fps)
}

/// Saved project filenames in the data directory.
pub fn list_projects() -> Result<Vec<String>> {
    let mut names = Vec::new();
    for entry in fs::read_dir(save_dir()?)? {
        let name = entry?.file_name().to_string_lossy().into_owned();
        if name.ends_with(EXTENSION) {
            names.push(name);
        }
    }
    names.sort();
    Ok(names)
}

/// Number of clips in a saved project, without keeping it loaded.
pub fn project_clip_count(filename: &str) -> Result<usize> {
    Ok(load(filename)?.clips.len())
}

pub fn save_count() -> Result<usize> {
    Ok(list_projects()?.len())
}

/// Autosave target for a project: sanitized name plus a marker suffix,
/// so an autosave never clobbers the explicit save.
pub fn autosave_filename(project_name: &str) -> String {
    let safe: String = project_name
        .trim()
        .chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, ' ' | '.' | '_'))
        .collect();
    format!("{safe}{EXTENSION}.autosave")
}
