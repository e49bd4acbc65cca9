//! Numerische Auswertung von Klothoiden (linear veränderliche Krümmung).
//!
//! Die Fresnel-Integrale werden per Simpson-Regel integriert. Die
//! Schrittweite richtet sich nach der Laufstrecke, sodass auch lange
//! Übergangsbögen genau bleiben.

use glam::DVec2;

/// Maximale Schrittweite der Integration in Metern.
const MAX_STEP: f64 = 0.25;
/// Mindestanzahl der Simpson-Intervalle (gerade).
const MIN_INTERVALS: usize = 8;
/// Obergrenze der Simpson-Intervalle (gerade); sehr lange Bögen werden gröber integriert.
const MAX_INTERVALS: usize = 20_000;

/// Lokaler Kurswinkel einer Klothoide nach `ds` Metern.
pub(crate) fn heading(curv_start: f64, curv_rate: f64, ds: f64) -> f64 {
    curv_start * ds + 0.5 * curv_rate * ds * ds
}

/// Lokale Position (u, v) einer im Ursprung mit Kurs 0 startenden Klothoide.
pub(crate) fn local_position(curv_start: f64, curv_rate: f64, ds: f64) -> DVec2 {
    if ds <= 0.0 {
        return DVec2::ZERO;
    }

    let mut intervals = ((ds / MAX_STEP).ceil() as usize).clamp(MIN_INTERVALS, MAX_INTERVALS);
    if intervals % 2 == 1 {
        intervals += 1;
    }

    let step = ds / intervals as f64;
    let direction = |s: f64| {
        let angle = heading(curv_start, curv_rate, s);
        DVec2::new(angle.cos(), angle.sin())
    };

    let mut sum = direction(0.0) + direction(ds);
    for i in 1..intervals {
        let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
        sum += direction(i as f64 * step) * weight;
    }

    sum * (step / 3.0)
}
