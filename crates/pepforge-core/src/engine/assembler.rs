use super::config::{AssemblyConfig, CarbonylDihedral};
use super::error::EngineError;
use crate::core::geometry::measure::{bond_angle, dihedral};
use crate::core::geometry::placement::{PlacementSpec, place_point_with_tolerance};
use crate::core::models::atom::{Atom, AtomRole, Element};
use crate::core::models::ids::{AtomId, ChainId, ResidueId};
use crate::core::models::residue::AminoAcid;
use crate::core::models::system::MolecularSystem;
use crate::core::params::{BackboneDihedrals, ResidueGeometry};
use crate::core::templates::{
    AmideHydrogen, Backbone, ResidueBlueprint, build_residue_with_tolerance,
};
use nalgebra::Point3;
use tracing::{debug, instrument, trace};

/// Lifecycle of a chain under construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainState {
    Empty,
    Initialized,
    /// The chain has been extended this many times since initialization.
    Extended(usize),
    Terminated,
}

/// Carbonyl oxygen of a residue.
///
/// An oxygen stays provisional until the next residue's nitrogen fixes its
/// direction, or the chain is closed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CarbonylOxygen {
    Provisional(Point3<f64>),
    Final(Point3<f64>),
}

impl CarbonylOxygen {
    pub fn position(&self) -> Point3<f64> {
        match self {
            CarbonylOxygen::Provisional(p) | CarbonylOxygen::Final(p) => *p,
        }
    }

    pub fn is_final(&self) -> bool {
        matches!(self, CarbonylOxygen::Final(_))
    }
}

#[derive(Debug, Clone)]
struct BuiltResidue {
    residue_id: ResidueId,
    residue_number: isize,
    amino_acid: AminoAcid,
    n: Point3<f64>,
    ca: Point3<f64>,
    c: Point3<f64>,
    o_atom: AtomId,
    carbonyl: CarbonylOxygen,
}

/// Grows one peptide chain residue by residue.
///
/// Every operation computes all of its coordinates before touching the
/// underlying [`MolecularSystem`], so an error leaves the chain exactly as it
/// was before the call.
#[derive(Debug, Clone)]
pub struct ChainAssembler {
    config: AssemblyConfig,
    system: MolecularSystem,
    chain_id: ChainId,
    state: ChainState,
    residues: Vec<BuiltResidue>,
}

impl Default for ChainAssembler {
    fn default() -> Self {
        Self::new(AssemblyConfig::default())
    }
}

impl ChainAssembler {
    pub fn new(config: AssemblyConfig) -> Self {
        let mut system = MolecularSystem::new();
        let chain_id = system.add_chain(config.chain_id);
        Self {
            config,
            system,
            chain_id,
            state: ChainState::Empty,
            residues: Vec::new(),
        }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    pub fn state(&self) -> ChainState {
        self.state
    }

    /// Number of residues in the chain.
    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn system(&self) -> &MolecularSystem {
        &self.system
    }

    pub fn into_system(self) -> MolecularSystem {
        self.system
    }

    /// Container id of the residue at `index` (0-based chain position).
    pub fn residue_id(&self, index: usize) -> Option<ResidueId> {
        self.residues.get(index).map(|r| r.residue_id)
    }

    pub fn carbonyl_oxygen(&self, index: usize) -> Option<CarbonylOxygen> {
        self.residues.get(index).map(|r| r.carbonyl)
    }

    /// Places the first residue in a fixed frame: CA at the origin, C on +x,
    /// N in the xy-plane.
    #[instrument(skip_all, name = "initialize_chain", fields(residue = %geometry.amino_acid))]
    pub fn initialize(&mut self, geometry: &ResidueGeometry) -> Result<ResidueId, EngineError> {
        if self.state != ChainState::Empty {
            return Err(EngineError::ProtocolViolation {
                operation: "initialize",
                state: self.state,
            });
        }

        let residue_number = self.config.first_residue_number;
        let bb = &geometry.backbone;
        let n_ca_c = bb.n_ca_c_angle.to_radians();

        let ca = Point3::origin();
        let c = Point3::new(bb.ca_c_length, 0.0, 0.0);
        let n = Point3::new(bb.ca_n_length * n_ca_c.cos(), bb.ca_n_length * n_ca_c.sin(), 0.0);

        let o = self.place(
            residue_number,
            "O",
            (&n, &ca, &c),
            bb.c_o_length,
            bb.ca_c_o_angle,
            self.carbonyl_dihedral(geometry),
        )?;
        let h = self.amide_hydrogen(residue_number, geometry, &n, &ca, &c)?;

        let backbone = Backbone { n, h, ca, c, o };
        let blueprint = self.evaluate(residue_number, &backbone, geometry)?;

        let residue_id = self.commit(blueprint, &backbone)?;
        self.state = ChainState::Initialized;
        debug!(residue_number, "Initialized chain with first residue");
        Ok(residue_id)
    }

    /// Appends one residue after the current last residue and fixes the
    /// previous residue's carbonyl oxygen.
    #[instrument(skip_all, name = "extend_chain", fields(residue = %geometry.amino_acid))]
    pub fn extend(
        &mut self,
        geometry: &ResidueGeometry,
        dihedrals: BackboneDihedrals,
    ) -> Result<ResidueId, EngineError> {
        let extensions = match self.state {
            ChainState::Initialized => 0,
            ChainState::Extended(n) => n,
            state @ (ChainState::Empty | ChainState::Terminated) => {
                return Err(EngineError::ProtocolViolation {
                    operation: "extend",
                    state,
                });
            }
        };
        let reference = self
            .residues
            .last()
            .cloned()
            .ok_or_else(|| EngineError::Internal("chain has no reference residue".to_string()))?;

        let residue_number = reference.residue_number + 1;
        let bb = &geometry.backbone;
        let omega = dihedrals.resolve_omega(geometry);

        let n = self.place(
            residue_number,
            "N",
            (&reference.n, &reference.ca, &reference.c),
            bb.peptide_bond,
            bb.ca_c_n_angle,
            dihedrals.psi_im1,
        )?;
        let ca = self.place(
            residue_number,
            "CA",
            (&reference.ca, &reference.c, &n),
            bb.ca_n_length,
            bb.c_n_ca_angle,
            omega,
        )?;
        let c = self.place(
            residue_number,
            "C",
            (&reference.c, &n, &ca),
            bb.ca_c_length,
            bb.n_ca_c_angle,
            dihedrals.phi,
        )?;
        let o = self.place(
            residue_number,
            "O",
            (&n, &ca, &c),
            bb.c_o_length,
            bb.ca_c_o_angle,
            self.carbonyl_dihedral(geometry),
        )?;
        let h = self.amide_hydrogen(residue_number, geometry, &n, &ca, &c)?;

        let backbone = Backbone { n, h, ca, c, o };
        let blueprint = self.evaluate(residue_number, &backbone, geometry)?;

        // The previous carbonyl points anti to the new nitrogen.
        let patched_o = self.place(
            reference.residue_number,
            "O",
            (&n, &reference.ca, &reference.c),
            bb.c_o_length,
            bb.ca_c_o_angle,
            180.0,
        )?;

        self.finalize_carbonyl(&reference, patched_o)?;
        let residue_id = self.commit(blueprint, &backbone)?;
        self.state = ChainState::Extended(extensions + 1);
        debug!(
            residue_number,
            phi = dihedrals.phi,
            psi_im1 = dihedrals.psi_im1,
            omega,
            "Extended chain"
        );
        Ok(residue_id)
    }

    /// Adds the terminal OXT with the configured bond length.
    pub fn close(&mut self) -> Result<AtomId, EngineError> {
        self.close_with_length(self.config.oxt_bond_length)
    }

    /// Adds the terminal OXT to the last residue and ends the chain.
    ///
    /// The C-OXT bond mirrors the C=O bond: same angle at C, opposite side
    /// of the N-CA-C plane.
    #[instrument(skip_all, name = "close_chain")]
    pub fn close_with_length(&mut self, oxt_bond_length: f64) -> Result<AtomId, EngineError> {
        if matches!(self.state, ChainState::Empty | ChainState::Terminated) {
            return Err(EngineError::ProtocolViolation {
                operation: "close",
                state: self.state,
            });
        }
        let last = self
            .residues
            .last()
            .cloned()
            .ok_or_else(|| EngineError::Internal("chain has no last residue".to_string()))?;

        let o = last.carbonyl.position();
        let degenerate = |source| EngineError::DegenerateGeometry {
            residue: last.residue_number,
            atom: "OXT",
            source,
        };
        let angle = bond_angle(&last.ca, &last.c, &o).map_err(degenerate)?;
        let o_dihedral = dihedral(&last.n, &last.ca, &last.c, &o);
        let oxt_dihedral = if o_dihedral < 0.0 {
            o_dihedral + 180.0
        } else {
            o_dihedral - 180.0
        };

        let oxt = self.place(
            last.residue_number,
            "OXT",
            (&last.n, &last.ca, &last.c),
            oxt_bond_length,
            angle,
            oxt_dihedral,
        )?;

        let atom = Atom::new("OXT", last.residue_id, Element::O, oxt).with_role(AtomRole::Terminal);
        let atom_id = self
            .system
            .add_atom_to_residue(last.residue_id, atom)
            .ok_or_else(|| EngineError::Internal("last residue missing from system".to_string()))?;
        if let Some(record) = self.residues.last_mut() {
            record.carbonyl = CarbonylOxygen::Final(o);
        }
        self.state = ChainState::Terminated;
        debug!(
            residue_number = last.residue_number,
            residue = %last.amino_acid,
            "Closed chain with OXT"
        );
        Ok(atom_id)
    }

    fn carbonyl_dihedral(&self, geometry: &ResidueGeometry) -> f64 {
        match self.config.carbonyl_dihedral {
            CarbonylDihedral::Table => geometry.backbone.n_ca_c_o_diangle,
            CarbonylDihedral::Trans => 180.0,
        }
    }

    fn amide_hydrogen(
        &self,
        residue_number: isize,
        geometry: &ResidueGeometry,
        n: &Point3<f64>,
        ca: &Point3<f64>,
        c: &Point3<f64>,
    ) -> Result<AmideHydrogen, EngineError> {
        if !geometry.amino_acid.has_amide_hydrogen() {
            return Ok(AmideHydrogen::AliasOfCarbonyl);
        }
        let bb = &geometry.backbone;
        let h = self.place(
            residue_number,
            "H",
            (c, ca, n),
            bb.n_h_length,
            bb.ca_n_h_angle,
            bb.c_ca_n_h_diangle,
        )?;
        Ok(AmideHydrogen::Placed(h))
    }

    fn place(
        &self,
        residue: isize,
        atom: &'static str,
        (a, b, c): (&Point3<f64>, &Point3<f64>, &Point3<f64>),
        length: f64,
        angle: f64,
        dihedral: f64,
    ) -> Result<Point3<f64>, EngineError> {
        let spec = PlacementSpec::new(*a, *b, *c, length, angle, dihedral);
        let position = place_point_with_tolerance(&spec, self.config.tolerance).map_err(|source| {
            EngineError::DegenerateGeometry {
                residue,
                atom,
                source,
            }
        })?;
        trace!(residue, atom, x = position.x, y = position.y, z = position.z, "Placed atom");
        Ok(position)
    }

    fn evaluate(
        &self,
        residue_number: isize,
        backbone: &Backbone,
        geometry: &ResidueGeometry,
    ) -> Result<ResidueBlueprint, EngineError> {
        build_residue_with_tolerance(
            residue_number,
            backbone,
            geometry,
            geometry.amino_acid,
            self.config.tolerance,
        )
        .map_err(|e| EngineError::from_template(residue_number, e))
    }

    fn finalize_carbonyl(
        &mut self,
        reference: &BuiltResidue,
        position: Point3<f64>,
    ) -> Result<(), EngineError> {
        let atom = self.system.atom_mut(reference.o_atom).ok_or_else(|| {
            EngineError::Internal("reference carbonyl oxygen missing from system".to_string())
        })?;
        atom.position = position;
        if let Some(record) = self.residues.last_mut() {
            record.carbonyl = CarbonylOxygen::Final(position);
        }
        Ok(())
    }

    fn commit(
        &mut self,
        blueprint: ResidueBlueprint,
        backbone: &Backbone,
    ) -> Result<ResidueId, EngineError> {
        let amino_acid = blueprint.amino_acid;
        let residue_id = self
            .system
            .add_residue(
                self.chain_id,
                blueprint.residue_number,
                amino_acid.to_three_letter(),
                Some(amino_acid),
            )
            .ok_or_else(|| EngineError::Internal("chain missing from system".to_string()))?;

        let mut o_atom = None;
        for spec in blueprint.atoms {
            let mut atom = Atom::new(spec.name, residue_id, spec.element, spec.position)
                .with_role(spec.role);
            atom.b_factor = spec.b_factor;
            atom.occupancy = spec.occupancy;
            let atom_id = self
                .system
                .add_atom_to_residue(residue_id, atom)
                .ok_or_else(|| EngineError::Internal("new residue missing from system".to_string()))?;
            if spec.name == "O" {
                o_atom = Some(atom_id);
            }
        }
        let o_atom = o_atom
            .ok_or_else(|| EngineError::Internal("residue built without carbonyl oxygen".to_string()))?;

        self.residues.push(BuiltResidue {
            residue_id,
            residue_number: blueprint.residue_number,
            amino_acid,
            n: backbone.n,
            ca: backbone.ca,
            c: backbone.c,
            o_atom,
            carbonyl: CarbonylOxygen::Provisional(backbone.o),
        });
        trace!(residue = %amino_acid, "Committed residue");
        Ok(residue_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::measure::{distance, wrap_degrees};
    use crate::core::params::GeometryLibrary;
    use crate::engine::config::AssemblyConfigBuilder;

    const TOLERANCE: f64 = 1e-7;

    fn geometry(aa: AminoAcid) -> ResidueGeometry {
        GeometryLibrary::standard().get(aa).unwrap().clone()
    }

    fn atom_names(assembler: &ChainAssembler, index: usize) -> Vec<String> {
        let residue_id = assembler.residue_id(index).unwrap();
        assembler
            .system()
            .residue_atoms(residue_id)
            .map(|atom| atom.name.clone())
            .collect()
    }

    fn position(assembler: &ChainAssembler, index: usize, name: &str) -> Point3<f64> {
        let residue_id = assembler.residue_id(index).unwrap();
        assembler.system().atom_position(residue_id, name).unwrap()
    }

    fn assert_angle_eq(actual: f64, expected: f64) {
        assert!(
            wrap_degrees(actual - expected).abs() < TOLERANCE,
            "angle {} != {}",
            actual,
            expected
        );
    }

    #[test]
    fn initialize_places_first_residue_in_fixed_frame() {
        let mut assembler = ChainAssembler::default();
        let ala = geometry(AminoAcid::Alanine);
        assembler.initialize(&ala).unwrap();

        assert_eq!(assembler.state(), ChainState::Initialized);
        assert_eq!(assembler.len(), 1);
        assert_eq!(atom_names(&assembler, 0), vec!["N", "H", "CA", "CB", "C", "O"]);

        let n = position(&assembler, 0, "N");
        let ca = position(&assembler, 0, "CA");
        let c = position(&assembler, 0, "C");
        assert_eq!(ca, Point3::origin());
        assert_eq!(c, Point3::new(ala.backbone.ca_c_length, 0.0, 0.0));
        assert_eq!(n.z, 0.0);
        assert!((distance(&ca, &n) - ala.backbone.ca_n_length).abs() < 1e-12);
        assert!((bond_angle(&n, &ca, &c).unwrap() - ala.backbone.n_ca_c_angle).abs() < TOLERANCE);

        assert!(matches!(
            assembler.carbonyl_oxygen(0),
            Some(CarbonylOxygen::Provisional(_))
        ));
    }

    #[test]
    fn initialize_twice_is_a_protocol_violation() {
        let mut assembler = ChainAssembler::default();
        assembler.initialize(&geometry(AminoAcid::Glycine)).unwrap();
        let result = assembler.initialize(&geometry(AminoAcid::Glycine));
        assert!(matches!(
            result,
            Err(EngineError::ProtocolViolation {
                operation: "initialize",
                state: ChainState::Initialized
            })
        ));
        assert_eq!(assembler.len(), 1);
    }

    #[test]
    fn extend_and_close_on_empty_chain_are_protocol_violations() {
        let mut assembler = ChainAssembler::default();
        assert!(matches!(
            assembler.extend(&geometry(AminoAcid::Glycine), BackboneDihedrals::extended()),
            Err(EngineError::ProtocolViolation { operation: "extend", state: ChainState::Empty })
        ));
        assert!(matches!(
            assembler.close(),
            Err(EngineError::ProtocolViolation { operation: "close", state: ChainState::Empty })
        ));
        assert_eq!(assembler.system().atom_count(), 0);
    }

    #[test]
    fn extend_honours_backbone_internal_coordinates() {
        let mut assembler = ChainAssembler::default();
        assembler.initialize(&geometry(AminoAcid::Alanine)).unwrap();
        let gly = geometry(AminoAcid::Glycine);
        let dihedrals = BackboneDihedrals::new(-57.0, -47.0, 175.0);
        assembler.extend(&gly, dihedrals).unwrap();

        let (n0, ca0, c0) = (
            position(&assembler, 0, "N"),
            position(&assembler, 0, "CA"),
            position(&assembler, 0, "C"),
        );
        let (n1, ca1, c1) = (
            position(&assembler, 1, "N"),
            position(&assembler, 1, "CA"),
            position(&assembler, 1, "C"),
        );

        assert!((distance(&c0, &n1) - gly.backbone.peptide_bond).abs() < 1e-9);
        assert!((distance(&n1, &ca1) - gly.backbone.ca_n_length).abs() < 1e-9);
        assert!((distance(&ca1, &c1) - gly.backbone.ca_c_length).abs() < 1e-9);
        assert_angle_eq(dihedral(&n0, &ca0, &c0, &n1), -47.0);
        assert_angle_eq(dihedral(&ca0, &c0, &n1, &ca1), 175.0);
        assert_angle_eq(dihedral(&c0, &n1, &ca1, &c1), -57.0);
        assert_eq!(assembler.state(), ChainState::Extended(1));
    }

    #[test]
    fn extend_patches_previous_carbonyl_anti_to_new_nitrogen() {
        let mut assembler = ChainAssembler::default();
        assembler.initialize(&geometry(AminoAcid::Alanine)).unwrap();
        let provisional = position(&assembler, 0, "O");

        assembler
            .extend(&geometry(AminoAcid::Glycine), BackboneDihedrals::extended())
            .unwrap();

        let patched = position(&assembler, 0, "O");
        assert!((patched - provisional).norm() > 1e-3);
        assert_eq!(assembler.carbonyl_oxygen(0), Some(CarbonylOxygen::Final(patched)));
        assert!(matches!(
            assembler.carbonyl_oxygen(1),
            Some(CarbonylOxygen::Provisional(_))
        ));

        let n1 = position(&assembler, 1, "N");
        let ca0 = position(&assembler, 0, "CA");
        let c0 = position(&assembler, 0, "C");
        assert_angle_eq(dihedral(&n1, &ca0, &c0, &patched), 180.0);
        assert!((distance(&c0, &patched) - 1.23).abs() < 1e-9);
    }

    #[test]
    fn only_the_last_carbonyl_stays_provisional() {
        let mut assembler = ChainAssembler::default();
        assembler.initialize(&geometry(AminoAcid::Methionine)).unwrap();
        let k = 4;
        for aa in [
            AminoAcid::Lysine,
            AminoAcid::Tryptophan,
            AminoAcid::Proline,
            AminoAcid::Serine,
        ] {
            assembler.extend(&geometry(aa), BackboneDihedrals::extended()).unwrap();
        }

        assert_eq!(assembler.len(), k + 1);
        assert_eq!(assembler.state(), ChainState::Extended(k));
        for i in 0..k {
            assert!(assembler.carbonyl_oxygen(i).unwrap().is_final(), "residue {}", i);
        }
        assert!(!assembler.carbonyl_oxygen(k).unwrap().is_final());

        let chain = assembler.system().chain(assembler.chain_id()).unwrap();
        assert_eq!(chain.residues().len(), k + 1);
        let numbers: Vec<isize> = chain
            .residues()
            .iter()
            .map(|&id| assembler.system().residue(id).unwrap().residue_number)
            .collect();
        assert_eq!(numbers, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn proline_extension_has_no_amide_hydrogen() {
        let mut assembler = ChainAssembler::default();
        assembler.initialize(&geometry(AminoAcid::Glycine)).unwrap();
        assembler
            .extend(&geometry(AminoAcid::Proline), BackboneDihedrals::new(-65.0, 140.0, -370.0))
            .unwrap();
        assert_eq!(atom_names(&assembler, 1), vec!["N", "CA", "CB", "C", "O"]);
    }

    #[test]
    fn alanine_glycine_scenario() {
        let mut assembler = ChainAssembler::default();
        assembler.initialize(&geometry(AminoAcid::Alanine)).unwrap();
        let initial_o = position(&assembler, 0, "O");

        assembler
            .extend(
                &geometry(AminoAcid::Glycine),
                BackboneDihedrals::new(-120.0, 140.0, -370.0),
            )
            .unwrap();

        assert_eq!(assembler.len(), 2);
        assert_eq!(atom_names(&assembler, 0), vec!["N", "H", "CA", "CB", "C", "O"]);
        assert_eq!(atom_names(&assembler, 1), vec!["N", "H", "CA", "C", "O"]);

        // omega = -370 falls back to the geometry default of 180.
        let ca0 = position(&assembler, 0, "CA");
        let c0 = position(&assembler, 0, "C");
        let n1 = position(&assembler, 1, "N");
        let ca1 = position(&assembler, 1, "CA");
        assert_angle_eq(dihedral(&ca0, &c0, &n1, &ca1), 180.0);

        assembler.close().unwrap();
        assert_eq!(assembler.state(), ChainState::Terminated);
        assert_eq!(atom_names(&assembler, 0), vec!["N", "H", "CA", "CB", "C", "O"]);
        assert_eq!(
            atom_names(&assembler, 1),
            vec!["N", "H", "CA", "C", "O", "OXT"]
        );
        assert!((position(&assembler, 0, "O") - initial_o).norm() > 1e-3);
    }

    #[test]
    fn close_mirrors_carbonyl_and_terminates() {
        let mut assembler = ChainAssembler::default();
        assembler.initialize(&geometry(AminoAcid::Alanine)).unwrap();
        assembler
            .extend(&geometry(AminoAcid::Leucine), BackboneDihedrals::extended())
            .unwrap();
        let oxt_id = assembler.close_with_length(1.25).unwrap();

        let oxt = assembler.system().atom(oxt_id).unwrap();
        assert_eq!(oxt.element, Element::O);
        assert_eq!(oxt.role, AtomRole::Terminal);

        let n = position(&assembler, 1, "N");
        let ca = position(&assembler, 1, "CA");
        let c = position(&assembler, 1, "C");
        let o = position(&assembler, 1, "O");
        assert!((distance(&c, &oxt.position) - 1.25).abs() < 1e-9);
        assert!(
            (bond_angle(&ca, &c, &oxt.position).unwrap() - bond_angle(&ca, &c, &o).unwrap()).abs()
                < TOLERANCE
        );
        assert_angle_eq(
            dihedral(&n, &ca, &c, &oxt.position),
            dihedral(&n, &ca, &c, &o) + 180.0,
        );
        assert!(assembler.carbonyl_oxygen(1).unwrap().is_final());

        assert!(matches!(
            assembler.close(),
            Err(EngineError::ProtocolViolation { operation: "close", state: ChainState::Terminated })
        ));
        assert!(matches!(
            assembler.extend(&geometry(AminoAcid::Glycine), BackboneDihedrals::extended()),
            Err(EngineError::ProtocolViolation { operation: "extend", state: ChainState::Terminated })
        ));
        let oxt_count = assembler
            .system()
            .residue_atoms(assembler.residue_id(1).unwrap())
            .filter(|atom| atom.name == "OXT")
            .count();
        assert_eq!(oxt_count, 1);
        assert!(atom_names(&assembler, 0).iter().all(|name| name != "OXT"));
    }

    #[test]
    fn single_residue_chain_can_be_closed() {
        let mut assembler = ChainAssembler::default();
        assembler.initialize(&geometry(AminoAcid::Glycine)).unwrap();
        assembler.close().unwrap();
        assert_eq!(
            atom_names(&assembler, 0),
            vec!["N", "H", "CA", "C", "O", "OXT"]
        );
    }

    #[test]
    fn failed_extend_leaves_chain_untouched() {
        let mut assembler = ChainAssembler::default();
        assembler.initialize(&geometry(AminoAcid::Alanine)).unwrap();
        let atoms_before = assembler.system().atom_count();
        let o_before = position(&assembler, 0, "O");

        let mut broken = geometry(AminoAcid::Glycine);
        broken.backbone.peptide_bond = 0.0;
        let result = assembler.extend(&broken, BackboneDihedrals::extended());

        assert!(matches!(
            result,
            Err(EngineError::DegenerateGeometry { residue: 2, atom: "N", .. })
        ));
        assert_eq!(assembler.state(), ChainState::Initialized);
        assert_eq!(assembler.len(), 1);
        assert_eq!(assembler.system().atom_count(), atoms_before);
        assert_eq!(position(&assembler, 0, "O"), o_before);
        assert!(!assembler.carbonyl_oxygen(0).unwrap().is_final());
    }

    #[test]
    fn failed_side_chain_placement_leaves_chain_untouched() {
        let mut assembler = ChainAssembler::default();
        assembler.initialize(&geometry(AminoAcid::Glycine)).unwrap();
        let atoms_before = assembler.system().atom_count();

        let broken = geometry(AminoAcid::Alanine).with_side_chain_field("CA_CB_length", -1.0);
        let result = assembler.extend(&broken, BackboneDihedrals::extended());

        assert!(matches!(
            result,
            Err(EngineError::DegenerateGeometry { atom: "CB", .. })
        ));
        assert_eq!(assembler.system().atom_count(), atoms_before);
        assert_eq!(assembler.state(), ChainState::Initialized);
    }

    #[test]
    fn trans_carbonyl_mode_seats_new_oxygen_at_180() {
        let config = AssemblyConfigBuilder::new()
            .carbonyl_dihedral(CarbonylDihedral::Trans)
            .build()
            .unwrap();
        let mut assembler = ChainAssembler::new(config);
        assembler.initialize(&geometry(AminoAcid::Alanine)).unwrap();
        assembler
            .extend(&geometry(AminoAcid::Alanine), BackboneDihedrals::extended())
            .unwrap();

        let n = position(&assembler, 1, "N");
        let ca = position(&assembler, 1, "CA");
        let c = position(&assembler, 1, "C");
        let o = position(&assembler, 1, "O");
        assert_angle_eq(dihedral(&n, &ca, &c, &o), 180.0);
    }

    #[test]
    fn configured_chain_letter_and_numbering_are_used() {
        let config = AssemblyConfigBuilder::new()
            .chain_id('H')
            .first_residue_number(100)
            .build()
            .unwrap();
        let mut assembler = ChainAssembler::new(config);
        assembler.initialize(&geometry(AminoAcid::Glycine)).unwrap();
        assembler
            .extend(&geometry(AminoAcid::Glycine), BackboneDihedrals::extended())
            .unwrap();

        let system = assembler.system();
        assert_eq!(system.find_chain_by_id('H'), Some(assembler.chain_id()));
        let residue = system.residue(assembler.residue_id(1).unwrap()).unwrap();
        assert_eq!(residue.residue_number, 101);
        assert_eq!(residue.name, "GLY");
    }
}
