//! Standalone 3Dmol.js viewer page for a structure file.
//!
//! The structure text is embedded directly in the page, so the HTML file can
//! be opened on its own. Hovering an atom shows `RESN RESI[:CHAIN]`.

use crate::utils::error::OutputError;
use log::{debug, info};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const VIEWER_SCRIPT_URL: &str = "https://3Dmol.org/build/3Dmol-min.js";

/// Structure format understood by 3Dmol's `addModel`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StructureFormat {
    Pdb,
    Cif,
}

impl StructureFormat {
    /// Guess from the file extension; anything not `.cif` is read as PDB
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("cif") => Self::Cif,
            _ => Self::Pdb,
        }
    }

    fn as_str(&self) -> &'static str {
        match self {
            Self::Pdb => "pdb",
            Self::Cif => "cif",
        }
    }
}

/// Render the viewer page for the given structure text
pub fn render_viewer(structure: &str, format: StructureFormat, title: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>{title}</title>
  <style>
    html, body {{ margin: 0; padding: 0; height: 100%; width: 100%; overflow: hidden; }}
    #viewer {{ width: 100%; height: 100%; position: relative; }}
    .loading {{ position: absolute; top: 50%; left: 50%; transform: translate(-50%, -50%); font-family: sans-serif; color: #666; }}
  </style>
  <script src="{script}"></script>
</head>
<body>
  <div id="viewer"><div class="loading">Rendering structure...</div></div>
  <script>
    document.addEventListener("DOMContentLoaded", function() {{
      let viewer = $3Dmol.createViewer(document.getElementById("viewer"), {{ backgroundColor: "white" }});
      viewer.addModel('{data}', "{format}");
      viewer.setStyle({{}}, {{ cartoon: {{ color: "spectrum" }} }});
      viewer.setHoverable({{}}, true,
        function(atom, viewer) {{
          if (!atom.label) {{
            let text = atom.resn + " " + atom.resi;
            if (atom.chain) text += ":" + atom.chain;
            atom.label = viewer.addLabel(text, {{
              position: atom,
              backgroundColor: "rgba(0,0,0,0.7)",
              fontColor: "white",
              fontSize: 12,
              borderRadius: 4,
              offset: {{ x: 0, y: -10 }}
            }});
          }}
        }},
        function(atom, viewer) {{
          if (atom.label) {{
            viewer.removeLabel(atom.label);
            delete atom.label;
          }}
        }}
      );
      viewer.zoomTo();
      viewer.render();
      let loading = document.querySelector(".loading");
      if (loading) loading.style.display = "none";
    }});
  </script>
</body>
</html>
"#,
        title = escape_html(title),
        script = VIEWER_SCRIPT_URL,
        data = escape_js_string(structure),
        format = format.as_str(),
    )
}

/// Read `structure_path` and write a viewer page to `output_path`
///
/// # Errors
/// * `OutputError::WriteFailed` - structure unreadable or page unwritable
/// * `OutputError::InvalidPath` - output path is empty or a directory
pub fn write_viewer(
    structure_path: impl AsRef<Path>,
    output_path: impl AsRef<Path>,
) -> Result<(), OutputError> {
    let structure_path = structure_path.as_ref();
    let output_path = output_path.as_ref();

    if output_path.as_os_str().is_empty() || output_path.is_dir() {
        return Err(OutputError::InvalidPath(format!(
            "Not a writable file path: {}",
            output_path.display()
        )));
    }

    let structure = std::fs::read_to_string(structure_path).map_err(OutputError::WriteFailed)?;
    debug!("Loaded structure {} ({} bytes)", structure_path.display(), structure.len());

    let title = structure_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let html = render_viewer(&structure, StructureFormat::from_path(structure_path), &title);

    let file = File::create(output_path).map_err(OutputError::WriteFailed)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(html.as_bytes()).map_err(OutputError::WriteFailed)?;
    writer.flush().map_err(OutputError::WriteFailed)?;

    info!("Viewer written to: {} ({:.2} KB)", output_path.display(), html.len() as f64 / 1024.0);

    Ok(())
}

/// Escape text for a single-quoted JS string inside a `<script>` block
fn escape_js_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            '<' => out.push_str("\\x3C"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
