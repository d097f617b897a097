use super::hull::Hull;
use super::loadout::Loadout;
use super::module::{Module, ModuleId};
use super::shipstats::ShipStats;
use super::spec::{derive_stats, ShipSpec};
use crate::errors::Errcode;

// A ship specification being edited, saved through SpecManager::save
#[derive(Debug, Clone, PartialEq)]
pub struct ShipDesign {
    name: String,
    original: Option<String>,
    loadout: Loadout,
}

impl ShipDesign {
    pub fn new(hull: Hull) -> ShipDesign {
        ShipDesign {
            name: String::new(),
            original: None,
            loadout: Loadout::new(hull),
        }
    }

    pub fn from_spec(spec: &ShipSpec) -> ShipDesign {
        ShipDesign {
            name: spec.name.clone(),
            original: Some(spec.name.clone()),
            loadout: spec.loadout().clone(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename<T: ToString>(&mut self, name: T) {
        self.name = name.to_string();
    }

    // Name of the spec this design was opened from
    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    pub fn exists(&self) -> bool {
        self.original.is_some()
    }

    pub fn hull(&self) -> &Hull {
        self.loadout.hull()
    }

    // Refused when the fitted modules don't fit in the new hull
    pub fn set_hull(&mut self, hull: Hull) -> Result<(), Errcode> {
        self.loadout = Loadout::refit(hull, &self.loadout)?;
        Ok(())
    }

    pub fn add(&mut self, module: &Module) -> bool {
        self.loadout.add(module)
    }

    pub fn remove(&mut self, id: ModuleId) -> Result<(), Errcode> {
        self.loadout.remove(id)
    }

    pub fn loadout(&self) -> &Loadout {
        &self.loadout
    }

    pub fn stats(&self) -> ShipStats {
        derive_stats(&self.loadout)
    }

    pub fn space_taken(&self) -> u32 {
        self.loadout.space_taken()
    }

    pub fn hull_capacity(&self) -> u32 {
        self.loadout.hull().capacity
    }
}

#[cfg(test)]
use super::spec::SpecManager;
#[cfg(test)]
use crate::catalog::ModuleCatalog;
#[cfg(test)]
use crate::civilization::CivId;

#[test]
fn test_design_hull_change() {
    let catalog = ModuleCatalog::standard();
    let large = catalog.hull_named("Large Hull").unwrap().clone();
    let small = catalog.hull_named("Small Hull").unwrap().clone();
    let breaker = catalog.module_named("Breaker").unwrap();

    let mut design = ShipDesign::new(large);
    for _ in 0..6 {
        assert!(design.add(breaker));
    }
    assert_eq!(design.space_taken(), 30);

    let before = design.clone();
    assert!(design.set_hull(small.clone()).is_err());
    assert_eq!(design, before);

    design.remove(breaker.id).unwrap();
    design.remove(breaker.id).unwrap();
    assert!(design.set_hull(small).is_ok());
    assert_eq!(design.hull_capacity(), 20);
    assert_eq!(design.stats().attack, 16);
    assert!(!design.add(breaker));
}

#[test]
fn test_design_save_and_rename() {
    let catalog = ModuleCatalog::standard();
    let hull = catalog.hull_named("Medium Hull").unwrap().clone();
    let engine = catalog.module_named("Snail Engine").unwrap();
    let mut specs = SpecManager::new(CivId(1));

    let mut design = ShipDesign::new(hull);
    assert!(!design.exists());
    assert!(design.add(engine));
    assert_eq!(specs.save(&design), Err(Errcode::InvalidSpecName));

    design.rename("Hauler");
    specs.save(&design).unwrap();
    assert_eq!(specs.save(&design), Err(Errcode::SpecAlreadyExists("Hauler".to_string())));

    let mut edit = ShipDesign::from_spec(specs.get("Hauler").unwrap());
    assert!(edit.exists());
    assert!(edit.add(engine));
    specs.save(&edit).unwrap();
    assert_eq!(specs.get("Hauler").unwrap().stats().range, 80.0);

    edit.rename("Long Hauler");
    specs.save(&edit).unwrap();
    assert_eq!(specs.names(), vec!["Long Hauler".to_string()]);
}
