//! Registry of quantity kinds and their units
//!
//! Kinds are registered with their base unit, then unit systems are
//! defined under them. Registration takes `&mut self` and is meant to run
//! once at start-up; afterwards the registry is read-only and lookups hand
//! out cheap clones of the stored units. [`SharedRegistry`] wraps a registry
//! in a single lock for hosts that must keep registering while reading.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tracing::{debug, warn};
use crate::conversion::ConversionFunctionPair;
use crate::derive::{derive, Operator};
use crate::kind::{KindRef, QuantityKind};
use crate::unit::{Quantity, UnitDefinition};
use crate::{Dimension, Error, Measurement, Result};

#[derive(Debug)]
struct KindEntry {
    kind: KindRef,
    units: BTreeMap<String, Quantity>,
    aliases: HashMap<String, String>,
}

impl KindEntry {
    fn new(kind: KindRef) -> Self {
        let base = Quantity::base(kind.clone());
        let mut units = BTreeMap::new();
        units.insert(base.name().to_string(), base);
        KindEntry {
            kind,
            units,
            aliases: HashMap::new(),
        }
    }

    /// Resolve by name, then alias, then symbol
    fn get(&self, name: &str) -> Option<&Quantity> {
        if let Some(unit) = self.units.get(name) {
            return Some(unit);
        }
        if let Some(canonical) = self.aliases.get(name) {
            return self.units.get(canonical);
        }
        self.units.values().find(|u| u.symbol() == name)
    }

    /// True when `name` already resolves to a unit, as a name, an alias
    /// or a symbol
    fn is_taken(&self, name: &str) -> bool {
        self.units.contains_key(name)
            || self.aliases.contains_key(name)
            || self.units.values().any(|u| u.symbol() == name)
    }
}

/// Maps kind names and unit names to units
#[derive(Debug, Default)]
pub struct QuantityRegistry {
    kinds: BTreeMap<String, KindEntry>,
}

impl QuantityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a linear kind with its base unit symbol. The base unit is
    /// defined automatically under that symbol.
    ///
    /// Registering the same name again with the same base unit returns the
    /// existing kind; a different base unit fails with `DuplicateKind`.
    pub fn register(&mut self, kind: &str, base_unit: &str) -> Result<KindRef> {
        self.register_kind(QuantityKind::new(kind, base_unit))
    }

    /// Register a pre-built kind (affine, derived or renamed)
    pub fn register_kind(&mut self, kind: QuantityKind) -> Result<KindRef> {
        if let Some(entry) = self.kinds.get(kind.name()) {
            if entry.kind.base_unit() != kind.base_unit() {
                return Err(Error::DuplicateKind {
                    kind: kind.name().to_string(),
                    existing: entry.kind.base_unit().to_string(),
                    requested: kind.base_unit().to_string(),
                });
            }
            if entry.kind.as_ref() != &kind {
                warn!(kind = kind.name(), "kind already registered with a different shape; keeping the first");
            }
            return Ok(entry.kind.clone());
        }

        debug!(kind = kind.name(), base_unit = kind.base_unit(), dimension = %kind.dimension(), "registered kind");
        let kind = Arc::new(kind);
        self.kinds.insert(kind.name().to_string(), KindEntry::new(kind.clone()));
        Ok(kind)
    }

    /// Register a kind derived from registered kinds, e.g.
    /// `register_derived("Area", "Distance", Operator::Square)`
    pub fn register_derived(&mut self, name: &str, component: &str, op: Operator<&str>) -> Result<KindRef> {
        let base = self.kind(component)?;
        let derived = match op {
            Operator::Square => derive(&base, Operator::Square)?,
            Operator::Product(rhs) => derive(&base, Operator::Product(self.kind(rhs)?.as_ref()))?,
            Operator::Ratio(rhs) => derive(&base, Operator::Ratio(self.kind(rhs)?.as_ref()))?,
        };
        self.register_kind(derived.named(name))
    }

    /// Define a unit from a name and its two conversion functions
    pub fn define_unit<T, F>(&mut self, kind: &str, name: &str, to_base: T, from_base: F) -> Result<Quantity>
    where
        T: Fn(f64) -> f64 + Send + Sync + 'static,
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        let conversion = ConversionFunctionPair::new(to_base, from_base);
        self.define(kind, UnitDefinition::new(name, name, conversion))
    }

    /// Define a unit that is a pure scale of the base unit
    pub fn define_linear(&mut self, kind: &str, name: &str, symbol: &str, factor: f64) -> Result<Quantity> {
        let conversion = ConversionFunctionPair::linear(factor)?;
        self.define(kind, UnitDefinition::new(name, symbol, conversion))
    }

    /// Define a unit with an offset; only affine kinds accept one
    pub fn define_affine(
        &mut self,
        kind: &str,
        name: &str,
        symbol: &str,
        factor: f64,
        offset: f64,
    ) -> Result<Quantity> {
        let conversion = ConversionFunctionPair::affine(factor, offset)?;
        self.define(kind, UnitDefinition::new(name, symbol, conversion))
    }

    /// Store a definition under a registered kind
    pub fn define(&mut self, kind: &str, definition: UnitDefinition) -> Result<Quantity> {
        let entry = self.entry_mut(kind)?;
        let unit = Quantity::with_definition(entry.kind.clone(), definition)?;
        Self::insert(entry, unit)
    }

    /// Derive a unit from registered components and store it under
    /// `kind`, which must be compatible with the derived kind.
    pub fn derive_unit(&mut self, kind: &str, component: &Quantity, op: Operator<&Quantity>) -> Result<Quantity> {
        let derived = crate::derive::derive_unit(component, op)?;
        let entry = self.entry_mut(kind)?;
        let unit = derived.rebind(entry.kind.clone())?;
        Self::insert(entry, unit)
    }

    /// Make `alias` resolve to `unit` within `kind`
    pub fn alias(&mut self, kind: &str, alias: &str, unit: &str) -> Result<()> {
        let entry = self.entry_mut(kind)?;
        let canonical = entry
            .get(unit)
            .map(|u| u.name().to_string())
            .ok_or_else(|| Error::UnitNotFound {
                kind: kind.to_string(),
                unit: unit.to_string(),
            })?;
        if entry.is_taken(alias) {
            return Err(Error::DuplicateUnit {
                kind: kind.to_string(),
                unit: alias.to_string(),
            });
        }
        entry.aliases.insert(alias.to_string(), canonical);
        Ok(())
    }

    /// Find a unit by name, alias or symbol
    pub fn lookup(&self, kind: &str, name: &str) -> Result<Quantity> {
        self.entry(kind)?
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnitNotFound {
                kind: kind.to_string(),
                unit: name.to_string(),
            })
    }

    pub fn kind(&self, name: &str) -> Result<KindRef> {
        self.entry(name).map(|e| e.kind.clone())
    }

    /// All registered kinds, ordered by name
    pub fn kinds(&self) -> impl Iterator<Item = &KindRef> {
        self.kinds.values().map(|e| &e.kind)
    }

    /// All units of a kind, ordered by name
    pub fn units(&self, kind: &str) -> Result<Vec<Quantity>> {
        Ok(self.entry(kind)?.units.values().cloned().collect())
    }

    /// The registered kind measuring `dimension`, if any
    pub fn kind_for(&self, dimension: &Dimension) -> Option<KindRef> {
        self.kinds()
            .find(|k| k.dimension() == dimension)
            .cloned()
    }

    /// Convert `value` between two units of a kind
    pub fn convert(&self, kind: &str, value: f64, from: &str, to: &str) -> Result<f64> {
        let from = self.lookup(kind, from)?;
        let to = self.lookup(kind, to)?;
        from.convert_to(&to, value)
    }

    /// Multiply two measurements and express the product in the base unit
    /// of the matching registered kind (Distance x Distance gives Area in
    /// m^2). Without a matching kind the derived product unit is kept.
    pub fn multiply(&self, a: &Measurement, b: &Measurement) -> Result<Measurement> {
        self.resolve(a.multiply(b)?)
    }

    /// Divide two measurements, resolving the result like [`Self::multiply`]
    pub fn divide(&self, a: &Measurement, b: &Measurement) -> Result<Measurement> {
        self.resolve(a.divide(b)?)
    }

    fn resolve(&self, measurement: Measurement) -> Result<Measurement> {
        let registered = self.kinds().find(|k| k.is_compatible(measurement.kind()));
        match registered {
            Some(kind) => {
                let base = self.lookup(kind.name(), kind.base_unit())?;
                measurement.convert_to(&base)
            }
            None => Ok(measurement),
        }
    }

    fn entry(&self, kind: &str) -> Result<&KindEntry> {
        self.kinds
            .get(kind)
            .ok_or_else(|| Error::UnknownKind(kind.to_string()))
    }

    fn entry_mut(&mut self, kind: &str) -> Result<&mut KindEntry> {
        self.kinds
            .get_mut(kind)
            .ok_or_else(|| Error::UnknownKind(kind.to_string()))
    }

    fn insert(entry: &mut KindEntry, unit: Quantity) -> Result<Quantity> {
        if let Some(taken) = [unit.name(), unit.symbol()].into_iter().find(|n| entry.is_taken(n)) {
            return Err(Error::DuplicateUnit {
                kind: entry.kind.name().to_string(),
                unit: taken.to_string(),
            });
        }
        debug!(kind = entry.kind.name(), unit = unit.name(), symbol = unit.symbol(), "defined unit");
        entry.units.insert(unit.name().to_string(), unit.clone());
        Ok(unit)
    }
}

/// A registry behind one lock, for registration that continues after
/// start-up. Conversions run on cloned units and never hold the lock.
#[derive(Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<RwLock<QuantityRegistry>>,
}

impl SharedRegistry {
    pub fn new(registry: QuantityRegistry) -> Self {
        SharedRegistry {
            inner: Arc::new(RwLock::new(registry)),
        }
    }

    /// Read access to the whole registry
    pub fn read(&self) -> RwLockReadGuard<'_, QuantityRegistry> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a registration step under the write lock
    pub fn update<R>(&self, f: impl FnOnce(&mut QuantityRegistry) -> Result<R>) -> Result<R> {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    pub fn register(&self, kind: &str, base_unit: &str) -> Result<KindRef> {
        self.update(|r| r.register(kind, base_unit))
    }

    pub fn define_unit<T, F>(&self, kind: &str, name: &str, to_base: T, from_base: F) -> Result<Quantity>
    where
        T: Fn(f64) -> f64 + Send + Sync + 'static,
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.update(|r| r.define_unit(kind, name, to_base, from_base))
    }

    pub fn lookup(&self, kind: &str, name: &str) -> Result<Quantity> {
        self.read().lookup(kind, name)
    }

    pub fn convert(&self, kind: &str, value: f64, from: &str, to: &str) -> Result<f64> {
        let (from, to) = {
            let registry = self.read();
            (registry.lookup(kind, from)?, registry.lookup(kind, to)?)
        };
        from.convert_to(&to, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn distance_registry() -> QuantityRegistry {
        let mut reg = QuantityRegistry::new();
        reg.register("Distance", "m").unwrap();
        reg.define_linear("Distance", "kilometer", "km", 1000.0).unwrap();
        reg.define_linear("Distance", "foot", "ft", 0.3048).unwrap();
        reg.alias("Distance", "feet", "foot").unwrap();
        reg
    }

    #[test]
    fn test_register_defines_base_unit() {
        let reg = distance_registry();
        let m = reg.lookup("Distance", "m").unwrap();
        assert!(m.is_base());
        assert_eq!(m.to_base(12.0).unwrap(), 12.0);
    }

    #[test]
    fn test_register_same_base_is_noop() {
        let mut reg = distance_registry();
        let again = reg.register("Distance", "m").unwrap();
        assert_eq!(again.base_unit(), "m");
        assert_eq!(reg.kinds().count(), 1);
        // existing units survive
        assert!(reg.lookup("Distance", "km").is_ok());
    }

    #[test]
    fn test_register_conflicting_base() {
        let mut reg = distance_registry();
        let err = reg.register("Distance", "ft").unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateKind {
                kind: "Distance".to_string(),
                existing: "m".to_string(),
                requested: "ft".to_string(),
            }
        );
    }

    #[test]
    fn test_define_under_unknown_kind() {
        let mut reg = QuantityRegistry::new();
        let err = reg.define_unit("Distance", "Metric", |x| x, |x| x).unwrap_err();
        assert_eq!(err, Error::UnknownKind("Distance".to_string()));
    }

    #[test]
    fn test_duplicate_unit() {
        let mut reg = distance_registry();
        let err = reg.define_linear("Distance", "foot", "ft", 0.3048).unwrap_err();
        assert!(matches!(err, Error::DuplicateUnit { .. }));
        assert!(reg.define_linear("Distance", "feet", "ft", 0.3048).is_err());
    }

    #[test]
    fn test_symbol_reuse_rejected() {
        let mut reg = distance_registry();
        reg.define_linear("Distance", "yard", "yd", 0.9144).unwrap();

        let err = reg.alias("Distance", "ft", "yard").unwrap_err();
        assert_eq!(
            err,
            Error::DuplicateUnit {
                kind: "Distance".to_string(),
                unit: "ft".to_string(),
            }
        );
        assert_eq!(reg.lookup("Distance", "ft").unwrap().name(), "foot");

        let err = reg.define_linear("Distance", "fathom", "ft", 1.8288).unwrap_err();
        assert!(matches!(err, Error::DuplicateUnit { unit, .. } if unit == "ft"));
        assert!(reg.define_unit("Distance", "km", |x| x, |x| x).is_err());
        assert!(reg.lookup("Distance", "fathom").is_err());
    }

    #[test]
    fn test_lookup() {
        let reg = distance_registry();
        assert_eq!(reg.lookup("Distance", "foot").unwrap().symbol(), "ft");
        assert_eq!(reg.lookup("Distance", "feet").unwrap().name(), "foot");
        assert_eq!(reg.lookup("Distance", "km").unwrap().name(), "kilometer");

        let err = reg.lookup("Distance", "furlong").unwrap_err();
        assert!(matches!(err, Error::UnitNotFound { .. }));
        assert!(matches!(reg.lookup("Mass", "kg"), Err(Error::UnknownKind(_))));
    }

    #[test]
    fn test_alias_to_missing_unit() {
        let mut reg = distance_registry();
        assert!(matches!(reg.alias("Distance", "leagues", "league"), Err(Error::UnitNotFound { .. })));
    }

    #[test]
    fn test_convert() {
        let reg = distance_registry();
        let v = reg.convert("Distance", 1.0, "km", "ft").unwrap();
        assert!((v - 3280.839895013123).abs() < 1e-9);
    }

    #[test]
    fn test_registration_order_irrelevant() {
        let mut other = QuantityRegistry::new();
        other.register("Distance", "m").unwrap();
        other.define_linear("Distance", "foot", "ft", 0.3048).unwrap();
        other.define_linear("Distance", "kilometer", "km", 1000.0).unwrap();

        let reg = distance_registry();
        assert_eq!(
            reg.convert("Distance", 2.5, "ft", "km").unwrap(),
            other.convert("Distance", 2.5, "ft", "km").unwrap()
        );
    }

    #[test]
    fn test_affine_unit_under_linear_kind() {
        let mut reg = distance_registry();
        let err = reg.define_affine("Distance", "shifted", "sh", 1.0, 3.0).unwrap_err();
        assert!(matches!(err, Error::NonLinearUnit { .. }));
    }

    #[test]
    fn test_define_unit_rejects_offset_under_linear_kind() {
        let mut reg = distance_registry();
        let err = reg.define_unit("Distance", "shifted", |x| x + 5.0, |x| x - 5.0).unwrap_err();
        assert!(matches!(err, Error::NonLinearUnit { .. }));
        assert!(reg.lookup("Distance", "shifted").is_err());
    }

    #[test]
    fn test_register_derived_and_multiply() {
        let mut reg = distance_registry();
        let area = reg.register_derived("Area", "Distance", Operator::Square).unwrap();
        assert_eq!(area.base_unit(), "m^2");

        let km = reg.lookup("Distance", "km").unwrap();
        let km2 = reg.derive_unit("Area", &km, Operator::Square).unwrap();
        assert_eq!(km2.to_base(1.0).unwrap(), 1_000_000.0);
        assert_eq!(reg.lookup("Area", "square kilometer").unwrap(), km2);

        let a = km.measure(2.0).unwrap();
        let b = reg.lookup("Distance", "m").unwrap().measure(3.0).unwrap();
        let product = reg.multiply(&a, &b).unwrap();
        assert_eq!(product.kind().name(), "Area");
        assert_eq!(product.unit().symbol(), "m^2");
        assert_eq!(product.value(), 6000.0);
    }

    #[test]
    fn test_results_resolve_regardless_of_operand_order() {
        let mut reg = distance_registry();
        reg.register_derived("Area", "Distance", Operator::Square).unwrap();
        reg.register_derived("Volume", "Area", Operator::Product("Distance")).unwrap();

        let len = reg.lookup("Distance", "m").unwrap().measure(2.0).unwrap();
        let area = reg.multiply(&len, &len).unwrap();

        let left = reg.multiply(&len, &area).unwrap();
        let right = reg.multiply(&area, &len).unwrap();
        assert_eq!(left.kind().name(), "Volume");
        assert_eq!(right.kind().name(), "Volume");
        assert_eq!(left.unit().symbol(), "m^3");
        assert_eq!(left.add(&right).unwrap().value(), 16.0);

        let back = reg.divide(&area, &len).unwrap();
        assert_eq!(back.kind().name(), "Distance");
        assert_eq!(back.unit().symbol(), "m");
        assert_eq!(back.add(&len).unwrap().value(), 4.0);
    }

    #[test]
    fn test_derive_unit_into_wrong_kind() {
        let mut reg = distance_registry();
        reg.register("Time", "s").unwrap();
        let km = reg.lookup("Distance", "km").unwrap();
        let err = reg.derive_unit("Time", &km, Operator::Square).unwrap_err();
        assert!(matches!(err, Error::IncompatibleKind { .. }));
    }

    #[test]
    fn test_units_listing() {
        let reg = distance_registry();
        let names: Vec<String> = reg.units("Distance").unwrap().iter().map(|u| u.name().to_string()).collect();
        assert_eq!(names, vec!["foot", "kilometer", "m"]);
    }

    #[test]
    fn test_shared_registry_concurrent() {
        let shared = SharedRegistry::new(distance_registry());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let shared = shared.clone();
                thread::spawn(move || {
                    let name = format!("unit{}", i);
                    let factor = (i + 1) as f64;
                    shared
                        .define_unit("Distance", &name, move |x| x * factor, move |x| x / factor)
                        .unwrap();
                    shared.convert("Distance", 1.0, &name, "m").unwrap()
                })
            })
            .collect();

        let mut results: Vec<f64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        results.sort_by(f64::total_cmp);
        assert_eq!(results, vec![1.0, 2.0, 3.0, 4.0]);
        assert_eq!(shared.read().units("Distance").unwrap().len(), 7);
    }
}
