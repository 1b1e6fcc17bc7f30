//! ASCII GMSH mesh file reader
//!
//! Understands both the legacy (`$NOD`/`$ELM`) and v2 (`$Nodes`/`$Elements`)
//! section keywords. Only triangle elements become panels; point elements
//! are taken as reference points for orienting panel normals; every other
//! element type is ignored.

use quadra_core::{vec_distance, vec_scale_add, Error, Panel, Result, Vec3};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::debug;

const NODE_START_LEGACY: &str = "$NOD";
const NODE_START_V2: &str = "$Nodes";
const NODE_END_LEGACY: &str = "$ENDNOD";
const NODE_END_V2: &str = "$EndNodes";
const ELEMENT_START_LEGACY: &str = "$ELM";
const ELEMENT_START_V2: &str = "$Elements";

const ELEMENT_TRIANGLE: usize = 2;
const ELEMENT_POINT: usize = 15;

/// Vertices closer than this are merged into one
const VERTEX_MERGE_DISTANCE: f64 = 1.0e-6;

/// Distance the centroid is displaced along the normal when orienting
/// panels against reference points
const ORIENTATION_PROBE_STEP: f64 = 1.0e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dialect {
    Legacy,
    V2,
}

/// A triangulated surface read from a mesh file.
#[derive(Debug, Clone)]
pub struct SurfaceMesh {
    /// Vertex coordinates; merged duplicates stay in the array but nothing
    /// references them
    pub vertices: Vec<Vec3>,
    /// Triangular panels indexing into `vertices`
    pub panels: Vec<Panel>,
}

/// Line-by-line reader that tracks the position for error messages.
struct MeshLines<R> {
    reader: R,
    path: std::path::PathBuf,
    line: usize,
}

impl<R: BufRead> MeshLines<R> {
    fn new(reader: R, path: &Path) -> Self {
        Self {
            reader,
            path: path.to_path_buf(),
            line: 0,
        }
    }

    fn next_line(&mut self, expecting: &str) -> Result<String> {
        let mut buffer = String::new();
        let read = self
            .reader
            .read_line(&mut buffer)
            .map_err(|e| Error::file_system(&self.path, "read mesh file", e))?;
        if read == 0 {
            return Err(Error::mesh_parse(
                &self.path,
                self.line,
                format!("unexpected end of file ({expecting})"),
            ));
        }
        self.line += 1;
        Ok(buffer.trim_end().to_string())
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::mesh_parse(&self.path, self.line, message)
    }
}

impl SurfaceMesh {
    /// Read a mesh from a GMSH file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| Error::file_system(path, "open mesh file", e))?;
        Self::from_reader(BufReader::new(file), path)
    }

    /// Read a mesh from any buffered reader; `path` is used only for error
    /// messages.
    pub fn from_reader(reader: impl BufRead, path: &Path) -> Result<Self> {
        let mut lines = MeshLines::new(reader, path);

        // Scan to the node section; the start keyword also fixes the dialect.
        let dialect = loop {
            let line = lines.next_line("node section keyword")?;
            if line.starts_with(NODE_START_V2) {
                break Dialect::V2;
            }
            if line.starts_with(NODE_START_LEGACY) {
                break Dialect::Legacy;
            }
        };

        let node_count: usize = lines
            .next_line("node count")?
            .trim()
            .parse()
            .map_err(|_| lines.error("invalid number of nodes"))?;

        // GMSH node numbering is arbitrary, so keep a map from the file's
        // indices to positions in our vertex array.
        let mut vertices: Vec<Vec3> = Vec::with_capacity(node_count);
        let mut index_map: HashMap<usize, usize> = HashMap::with_capacity(node_count);
        for _ in 0..node_count {
            let line = lines.next_line("node line")?;
            let mut fields = line.split_whitespace();
            let parsed = (|| {
                let index: usize = fields.next()?.parse().ok()?;
                let x: f64 = fields.next()?.parse().ok()?;
                let y: f64 = fields.next()?.parse().ok()?;
                let z: f64 = fields.next()?.parse().ok()?;
                Some((index, [x, y, z]))
            })();
            let (index, position) =
                parsed.ok_or_else(|| lines.error("invalid node specification"))?;
            index_map.insert(index, vertices.len());
            vertices.push(position);
        }

        merge_coincident_vertices(&vertices, &mut index_map);

        let node_end = match dialect {
            Dialect::Legacy => NODE_END_LEGACY,
            Dialect::V2 => NODE_END_V2,
        };
        let line = lines.next_line("end of node section")?;
        if !line.starts_with(node_end) {
            return Err(lines.error("unexpected keyword"));
        }

        let element_start = match dialect {
            Dialect::Legacy => ELEMENT_START_LEGACY,
            Dialect::V2 => ELEMENT_START_V2,
        };
        let line = lines.next_line("start of element section")?;
        if !line.starts_with(element_start) {
            return Err(lines.error("unexpected keyword"));
        }

        let element_count: usize = lines
            .next_line("element count")?
            .trim()
            .parse()
            .map_err(|_| lines.error("invalid number of elements"))?;

        let mut panels: Vec<Panel> = Vec::new();
        let mut reference_points: Vec<usize> = Vec::new();
        for _ in 0..element_count {
            let line = lines.next_line("element line")?;
            let (element_type, node_ids) = parse_element(&line, dialect)
                .ok_or_else(|| lines.error("invalid element specification"))?;

            match element_type {
                ELEMENT_TRIANGLE => {
                    if node_ids.len() != 3 {
                        return Err(lines.error("invalid element specification"));
                    }
                    let mut corner_indices = [0usize; 3];
                    for (slot, id) in corner_indices.iter_mut().zip(node_ids.iter()) {
                        *slot = *index_map
                            .get(id)
                            .ok_or_else(|| lines.error(format!("unknown node index {id}")))?;
                    }
                    let index = panels.len();
                    panels.push(Panel::new(&vertices, corner_indices, index));
                }
                ELEMENT_POINT => {
                    let id = node_ids
                        .first()
                        .ok_or_else(|| lines.error("invalid element specification"))?;
                    let vertex = *index_map
                        .get(id)
                        .ok_or_else(|| lines.error(format!("unknown node index {id}")))?;
                    reference_points.push(vertex);
                }
                other => {
                    debug!("ignoring element of unknown type {other}");
                }
            }
        }

        if !reference_points.is_empty() {
            orient_panels(&mut panels, &vertices, &reference_points);
        }

        debug!(
            "read {} vertices and {} panels from '{}'",
            vertices.len(),
            panels.len(),
            path.display()
        );
        Ok(Self { vertices, panels })
    }
}

/// Remap references to vertices that coincide within
/// `VERTEX_MERGE_DISTANCE` onto the first occurrence. The vertex array
/// itself is left intact; only the index map changes.
fn merge_coincident_vertices(vertices: &[Vec3], index_map: &mut HashMap<usize, usize>) {
    let mut merged = 0usize;
    for i in 0..vertices.len() {
        for j in (i + 1)..vertices.len() {
            if vec_distance(&vertices[i], &vertices[j]) < VERTEX_MERGE_DISTANCE {
                for target in index_map.values_mut() {
                    if *target == j {
                        *target = i;
                        merged += 1;
                    }
                }
            }
        }
    }
    if merged > 0 {
        debug!("merged {merged} coincident vertices");
    }
}

/// Split one element line into its type and node ids, following the
/// dialect's field layout. Returns `None` on malformed lines.
fn parse_element(line: &str, dialect: Dialect) -> Option<(usize, Vec<usize>)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    match dialect {
        Dialect::Legacy => {
            // element-number type phys-region elem-region node-count nodes...
            if fields.len() < 5 {
                return None;
            }
            let element_type: usize = fields[1].parse().ok()?;
            let node_count: usize = fields[4].parse().ok()?;
            let ids = fields
                .get(5..5 + node_count)?
                .iter()
                .map(|f| f.parse().ok())
                .collect::<Option<Vec<usize>>>()?;
            Some((element_type, ids))
        }
        Dialect::V2 => {
            // element-number type tag-count tags... nodes...
            if fields.len() < 3 {
                return None;
            }
            let element_type: usize = fields[1].parse().ok()?;
            let tag_count: usize = fields[2].parse().ok()?;
            let ids = fields
                .get(3 + tag_count..)?
                .iter()
                .map(|f| f.parse().ok())
                .collect::<Option<Vec<usize>>>()?;
            Some((element_type, ids))
        }
    }
}

/// Orient every panel's normal away from its nearest reference point.
///
/// The probe displaces the centroid a short step along the current normal;
/// if that brings it closer to the reference point the normal faces the
/// wrong way and the panel is flipped.
fn orient_panels(panels: &mut [Panel], vertices: &[Vec3], reference_points: &[usize]) {
    for panel in panels.iter_mut() {
        let mut nearest = &vertices[reference_points[0]];
        let mut nearest_distance = vec_distance(&panel.centroid, nearest);
        for &rp in &reference_points[1..] {
            let candidate = &vertices[rp];
            let distance = vec_distance(&panel.centroid, candidate);
            if distance < nearest_distance {
                nearest_distance = distance;
                nearest = candidate;
            }
        }

        let displaced = vec_scale_add(&panel.centroid, ORIENTATION_PROBE_STEP, &panel.normal);
        if vec_distance(&displaced, nearest) < nearest_distance {
            panel.flip();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn parse(document: &str) -> Result<SurfaceMesh> {
        SurfaceMesh::from_reader(Cursor::new(document), Path::new("test.msh"))
    }

    const V2_SQUARE: &str = "\
$MeshFormat
2.2 0 8
$EndMeshFormat
$Nodes
4
1 0 0 0
2 1 0 0
3 0 1 0
4 1 1 0
$EndNodes
$Elements
2
1 2 2 0 1 1 2 3
2 2 2 0 1 2 4 3
$EndElements
";

    const LEGACY_TRIANGLE: &str = "\
$NOD
3
1 0.0 0.0 0.0
2 1.0 0.0 0.0
3 0.0 1.0 0.0
$ENDNOD
$ELM
1
1 2 0 0 3 1 2 3
$ENDELM
";

    #[test]
    fn test_v2_document_parses_two_panels() {
        let mesh = parse(V2_SQUARE).expect("v2 document should parse");
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.panels.len(), 2);
        assert_eq!(mesh.panels[0].vertex_indices, [0, 1, 2]);
        assert_eq!(mesh.panels[1].vertex_indices, [1, 3, 2]);
        assert_eq!(mesh.panels[1].index, 1);
    }

    #[test]
    fn test_legacy_document_parses() {
        let mesh = parse(LEGACY_TRIANGLE).expect("legacy document should parse");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.panels.len(), 1);
        assert!((mesh.panels[0].area - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_scattered_node_numbering_is_remapped() {
        let document = "\
$Nodes
3
10 0 0 0
200 1 0 0
7 0 1 0
$EndNodes
$Elements
1
1 2 2 0 1 10 200 7
$EndElements
";
        let mesh = parse(document).expect("scattered numbering should parse");
        assert_eq!(mesh.panels[0].vertex_indices, [0, 1, 2]);
    }

    #[test]
    fn test_coincident_nodes_are_merged() {
        // Nodes 2 and 4 coincide; the second triangle must reference the
        // first occurrence.
        let document = "\
$Nodes
5
1 0 0 0
2 1 0 0
3 0 1 0
4 1 0 0
5 1 1 0
$EndNodes
$Elements
2
1 2 2 0 1 1 2 3
2 2 2 0 1 4 5 3
$EndElements
";
        let mesh = parse(document).expect("mesh with duplicates should parse");
        assert_eq!(mesh.panels[1].vertex_indices[0], 1);
    }

    #[test]
    fn test_unknown_element_types_are_ignored() {
        let document = "\
$Nodes
3
1 0 0 0
2 1 0 0
3 0 1 0
$EndNodes
$Elements
2
1 1 2 0 1 1 2
2 2 2 0 1 1 2 3
$EndElements
";
        let mesh = parse(document).expect("line elements should be ignored");
        assert_eq!(mesh.panels.len(), 1);
    }

    #[test]
    fn test_reference_point_flips_inward_facing_panel() {
        // Counter-clockwise triangle in the z = 0 plane has normal +z; a
        // reference point above it means the normal faces the reference
        // point and must be flipped away.
        let document = "\
$Nodes
4
1 0 0 0
2 1 0 0
3 0 1 0
4 0.3 0.3 1.0
$EndNodes
$Elements
2
1 2 2 0 1 1 2 3
2 15 2 0 1 4
$EndElements
";
        let mesh = parse(document).expect("mesh with reference point should parse");
        assert!((mesh.panels[0].normal[2] + 1.0).abs() < 1e-12);
        assert_eq!(mesh.panels[0].vertex_indices, [2, 1, 0]);
    }

    #[test]
    fn test_reference_point_keeps_outward_facing_panel() {
        let document = "\
$Nodes
4
1 0 0 0
2 1 0 0
3 0 1 0
4 0.3 0.3 -1.0
$EndNodes
$Elements
2
1 2 2 0 1 1 2 3
2 15 2 0 1 4
$EndElements
";
        let mesh = parse(document).expect("mesh with reference point should parse");
        assert!((mesh.panels[0].normal[2] - 1.0).abs() < 1e-12);
        assert_eq!(mesh.panels[0].vertex_indices, [0, 1, 2]);
    }

    #[test]
    fn test_missing_node_section_is_an_error() {
        let err = parse("$Elements\n0\n$EndElements\n").expect_err("should fail");
        assert!(err.to_string().contains("unexpected end of file"));
    }

    #[test]
    fn test_bad_node_count_is_an_error() {
        let err = parse("$Nodes\nbogus\n").expect_err("should fail");
        assert!(err.to_string().contains("invalid number of nodes"));
    }

    #[test]
    fn test_bad_node_line_reports_position() {
        let err = parse("$Nodes\n2\n1 0 0 0\n2 nope 0 0\n").expect_err("should fail");
        assert_eq!(err.to_string(), "test.msh:4: invalid node specification");
    }

    #[test]
    fn test_unterminated_node_section_is_an_error() {
        let document = "\
$Nodes
1
1 0 0 0
$Elements
";
        let err = parse(document).expect_err("should fail");
        assert!(err.to_string().contains("unexpected keyword"));
    }

    #[test]
    fn test_from_file_reads_from_disk() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let path = dir.path().join("square.msh");
        std::fs::write(&path, V2_SQUARE).expect("write mesh file");

        let mesh = SurfaceMesh::from_file(&path).expect("file should parse");
        assert_eq!(mesh.panels.len(), 2);
    }

    #[test]
    fn test_from_file_missing_reports_file_system_error() {
        let err = SurfaceMesh::from_file(Path::new("/no/such/mesh.msh"))
            .expect_err("missing file should fail");
        assert!(matches!(err, Error::FileSystem { .. }));
    }
}
