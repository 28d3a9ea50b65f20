use super::TemplateError;
use super::library::{PlacementStep, template};
use crate::core::geometry::placement::{
    DEGENERACY_EPSILON, PlacementSpec, place_point_with_tolerance,
};
use crate::core::models::atom::{AtomRole, DEFAULT_B_FACTOR, DEFAULT_OCCUPANCY, Element};
use crate::core::models::residue::AminoAcid;
use crate::core::params::ResidueGeometry;
use nalgebra::Point3;
use tracing::trace;

/// The amide hydrogen of a backbone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AmideHydrogen {
    Placed(Point3<f64>),
    /// No amide hydrogen exists (proline); the slot refers to the carbonyl
    /// oxygen and is never emitted as an atom.
    AliasOfCarbonyl,
}

impl AmideHydrogen {
    pub fn position(&self, carbonyl: &Point3<f64>) -> Point3<f64> {
        match self {
            AmideHydrogen::Placed(position) => *position,
            AmideHydrogen::AliasOfCarbonyl => *carbonyl,
        }
    }
}

/// Already-placed backbone atoms of one residue.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backbone {
    pub n: Point3<f64>,
    pub h: AmideHydrogen,
    pub ca: Point3<f64>,
    pub c: Point3<f64>,
    pub o: Point3<f64>,
}

/// A fully evaluated atom, not yet owned by any container.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomSpec {
    pub name: &'static str,
    pub element: Element,
    pub role: AtomRole,
    pub position: Point3<f64>,
    pub b_factor: f64,
    pub occupancy: f64,
}

impl AtomSpec {
    pub fn new(name: &'static str, element: Element, role: AtomRole, position: Point3<f64>) -> Self {
        Self {
            name,
            element,
            role,
            position,
            b_factor: DEFAULT_B_FACTOR,
            occupancy: DEFAULT_OCCUPANCY,
        }
    }
}

/// A residue with every atom placed, in output order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResidueBlueprint {
    pub residue_number: isize,
    pub amino_acid: AminoAcid,
    pub atoms: Vec<AtomSpec>,
}

impl ResidueBlueprint {
    pub fn atom(&self, name: &str) -> Option<&AtomSpec> {
        self.atoms.iter().find(|atom| atom.name == name)
    }

    pub fn position(&self, name: &str) -> Option<Point3<f64>> {
        self.atom(name).map(|atom| atom.position)
    }

    pub fn atom_names(&self) -> Vec<&'static str> {
        self.atoms.iter().map(|atom| atom.name).collect()
    }
}

pub fn build_residue(
    residue_number: isize,
    backbone: &Backbone,
    geometry: &ResidueGeometry,
    amino_acid: AminoAcid,
) -> Result<ResidueBlueprint, TemplateError> {
    build_residue_with_tolerance(
        residue_number,
        backbone,
        geometry,
        amino_acid,
        DEGENERACY_EPSILON,
    )
}

/// Like [`build_residue`], with the variant given as a one- or three-letter
/// code.
pub fn build_residue_by_tag(
    residue_number: isize,
    backbone: &Backbone,
    geometry: &ResidueGeometry,
    tag: &str,
) -> Result<ResidueBlueprint, TemplateError> {
    let amino_acid: AminoAcid = tag
        .parse()
        .map_err(|_| TemplateError::UnknownVariant(tag.to_string()))?;
    build_residue(residue_number, backbone, geometry, amino_acid)
}

/// Evaluates the side-chain template of `amino_acid` on `backbone`.
///
/// Atoms come out as N, H, CA, side chain in placement order, C, O. H is
/// left out when the backbone has no amide hydrogen.
pub fn build_residue_with_tolerance(
    residue_number: isize,
    backbone: &Backbone,
    geometry: &ResidueGeometry,
    amino_acid: AminoAcid,
    tolerance: f64,
) -> Result<ResidueBlueprint, TemplateError> {
    let steps = template(amino_acid);

    let mut placed: Vec<(&'static str, Point3<f64>)> =
        vec![("N", backbone.n), ("CA", backbone.ca), ("C", backbone.c)];
    let mut side_chain = Vec::with_capacity(steps.len());

    for step in steps {
        let position = place_step(step, &placed, geometry, amino_acid, tolerance)?;
        trace!(residue = residue_number, atom = step.atom, "Placed side-chain atom");
        placed.push((step.atom, position));
        side_chain.push(AtomSpec::new(
            step.atom,
            step.element,
            AtomRole::Sidechain,
            position,
        ));
    }

    let mut atoms = Vec::with_capacity(side_chain.len() + 5);
    atoms.push(AtomSpec::new("N", Element::N, AtomRole::Backbone, backbone.n));
    if let AmideHydrogen::Placed(h) = backbone.h {
        atoms.push(AtomSpec::new("H", Element::H, AtomRole::Backbone, h));
    }
    atoms.push(AtomSpec::new("CA", Element::C, AtomRole::Backbone, backbone.ca));
    atoms.extend(side_chain);
    atoms.push(AtomSpec::new("C", Element::C, AtomRole::Backbone, backbone.c));
    atoms.push(AtomSpec::new("O", Element::O, AtomRole::Backbone, backbone.o));

    Ok(ResidueBlueprint {
        residue_number,
        amino_acid,
        atoms,
    })
}

fn place_step(
    step: &PlacementStep,
    placed: &[(&'static str, Point3<f64>)],
    geometry: &ResidueGeometry,
    amino_acid: AminoAcid,
    tolerance: f64,
) -> Result<Point3<f64>, TemplateError> {
    let lookup = |name: &'static str| {
        placed
            .iter()
            .find(|(placed_name, _)| *placed_name == name)
            .map(|(_, position)| *position)
            .ok_or(TemplateError::MissingReference {
                residue: amino_acid,
                atom: name,
            })
    };
    let field = |name: &'static str| {
        geometry.field(name).ok_or(TemplateError::MissingField {
            residue: amino_acid,
            field: name,
        })
    };

    let [a, b, c] = step.references;
    let spec = PlacementSpec::new(
        lookup(a)?,
        lookup(b)?,
        lookup(c)?,
        field(step.length_field)?,
        field(step.angle_field)?,
        field(step.dihedral_field)?,
    );

    place_point_with_tolerance(&spec, tolerance).map_err(|source| TemplateError::Placement {
        residue: amino_acid,
        atom: step.atom,
        source,
    })
}
