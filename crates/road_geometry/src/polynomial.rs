//! Kubische Polynome `a + b·ds + c·ds² + d·ds³`.
//!
//! OpenDRIVE beschreibt Höhenprofil, Lane-Offset, Lane-Breiten und -Ränder
//! jeweils abschnittsweise mit diesem Polynom. `ds` ist immer lokal, also
//! relativ zum Start des jeweiligen Abschnitts.

/// Koeffizienten eines kubischen Polynoms.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CubicPolynomial {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
}

impl CubicPolynomial {
    /// Erstellt ein neues Polynom
    pub fn new(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self { a, b, c, d }
    }

    /// Wert an der lokalen Position `ds` (Horner-Schema)
    pub fn value(&self, ds: f64) -> f64 {
        ((self.d * ds + self.c) * ds + self.b) * ds + self.a
    }

    /// Erste Ableitung an `ds`
    pub fn slope(&self, ds: f64) -> f64 {
        (3.0 * self.d * ds + 2.0 * self.c) * ds + self.b
    }

    /// Zweite Ableitung an `ds`
    pub fn second_derivative(&self, ds: f64) -> f64 {
        6.0 * self.d * ds + 2.0 * self.c
    }

    /// `true` wenn alle Koeffizienten exakt 0 sind
    pub fn is_zero(&self) -> bool {
        self.a == 0.0 && self.b == 0.0 && self.c == 0.0 && self.d == 0.0
    }

    pub fn is_finite(&self) -> bool {
        self.a.is_finite() && self.b.is_finite() && self.c.is_finite() && self.d.is_finite()
    }
}

/// Ein an einer Position `s` beginnender Polynom-Abschnitt.
///
/// `s` ist je nach Verwendung absolut (Höhenprofil, Lane-Offset) oder
/// relativ zum Start der Lane-Section (Breite, Rand).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolynomialRecord {
    pub s: f64,
    pub polynomial: CubicPolynomial,
}

impl PolynomialRecord {
    pub fn new(s: f64, a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            s,
            polynomial: CubicPolynomial::new(a, b, c, d),
        }
    }

    /// Wertet das Polynom an der Position `s` (gleiches Bezugssystem wie `self.s`) aus.
    pub fn value_at(&self, s: f64) -> f64 {
        self.polynomial.value(s - self.s)
    }
}

/// Findet den gültigen Abschnitt für `s` in einer nach `s` sortierten Liste.
///
/// Gültig ist der letzte Abschnitt mit `record.s <= s`; liegt `s` vor dem
/// ersten Abschnitt, wird der erste verwendet.
pub fn record_at(records: &[PolynomialRecord], s: f64) -> Option<&PolynomialRecord> {
    records
        .iter()
        .rev()
        .find(|record| record.s <= s)
        .or_else(|| records.first())
}

/// Wertet eine abschnittsweise definierte Polynom-Liste aus. Leere Liste → 0.
pub fn evaluate_records(records: &[PolynomialRecord], s: f64) -> f64 {
    record_at(records, s).map_or(0.0, |record| record.value_at(s))
}
