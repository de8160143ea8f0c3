//! Connected components and left/right splitting.

use std::cmp::Ordering;

use super::{Side, TriangleMesh};

impl TriangleMesh {
    /// Splits the mesh into its connected components.
    ///
    /// Faces are connected when they share a vertex; the pieces need not be
    /// closed surfaces. Components are returned in order of their lowest
    /// face index, each holding only the vertices it references (in ascending
    /// original index order) and the same tag as `self`.
    pub fn connected_components(&self) -> Vec<TriangleMesh> {
        let mut sets = DisjointSets::new(self.vertices.len());
        for &[a, b, c] in &self.faces {
            sets.union(a as usize, b as usize);
            sets.union(a as usize, c as usize);
        }

        // Number components by first appearance while walking faces in order.
        let mut root_to_component: Vec<Option<usize>> = vec![None; self.vertices.len()];
        let mut component_faces: Vec<Vec<[u32; 3]>> = Vec::new();
        for &face in &self.faces {
            let root = sets.find(face[0] as usize);
            let component = *root_to_component[root].get_or_insert_with(|| {
                component_faces.push(Vec::new());
                component_faces.len() - 1
            });
            component_faces[component].push(face);
        }

        component_faces
            .into_iter()
            .map(|faces| self.submesh(faces))
            .collect()
    }

    /// Splits a bilateral structure into at most two sided meshes.
    ///
    /// The two components with the most faces are kept (ties go to the one
    /// found first) and ordered by the depth (z) coordinate of their
    /// centroids: the lower one is [`Side::Left`], the higher one
    /// [`Side::Right`]. A single component comes back alone as the left
    /// side. The result is never empty for a valid mesh.
    pub fn split_left_right(&self) -> Vec<TriangleMesh> {
        let mut parts = self.connected_components();
        let total = parts.len();

        // Stable sort keeps discovery order among equal face counts.
        parts.sort_by(|a, b| b.num_faces().cmp(&a.num_faces()));
        parts.truncate(2);
        if total > parts.len() {
            log::debug!(
                "'{}': keeping 2 of {total} components, dropped {} smaller fragments",
                self.tag.label,
                total - parts.len()
            );
        }

        let mut keyed: Vec<(f32, TriangleMesh)> =
            parts.into_iter().map(|m| (m.centroid().z, m)).collect();
        keyed.sort_by(|(za, _), (zb, _)| za.partial_cmp(zb).unwrap_or(Ordering::Equal));

        keyed
            .into_iter()
            .zip([Side::Left, Side::Right])
            .map(|((_, mut part), side)| {
                part.tag = part.tag.with_side(side);
                part
            })
            .collect()
    }

    /// Builds a mesh from a subset of this mesh's faces.
    fn submesh(&self, faces: Vec<[u32; 3]>) -> TriangleMesh {
        let mut remap: Vec<Option<u32>> = vec![None; self.vertices.len()];
        for face in &faces {
            for &i in face {
                remap[i as usize] = Some(0);
            }
        }

        let mut vertices = Vec::new();
        for (old, slot) in remap.iter_mut().enumerate() {
            if slot.is_some() {
                *slot = Some(vertices.len() as u32);
                vertices.push(self.vertices[old]);
            }
        }

        let faces = faces
            .into_iter()
            .map(|f| f.map(|i| remap[i as usize].unwrap_or_default()))
            .collect();

        TriangleMesh {
            tag: self.tag.clone(),
            vertices,
            faces,
        }
    }
}

/// Union-find over vertex indices with path halving.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra != rb {
            // Smaller root wins.
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}
