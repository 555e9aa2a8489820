//! Ruling detection and edge normalization.
//!
//! Raw ruling primitives (segments, rectangle outlines, curves, dots) become
//! normalized [`Edge`]s through a fixed sequence of pure passes:
//!
//! 1. orientation — near-axis segments are classified, rectangle outlines
//!    decompose into four borders, near-straight curves are linearized by
//!    chord when enabled;
//! 2. dotted normalization — collinear dots and short dashes collapse into
//!    one continuous dotted edge;
//! 3. snapping — near-collinear edges are forced onto a shared coordinate
//!    and overlapping collinear spans merge;
//! 4. double-ruling collapse — closely spaced parallel pairs merge into a
//!    single midpoint edge tagged `double`;
//! 5. border synthesis — missing outer borders implied by the grid extent
//!    are added when enabled.
//!
//! Each pass produces a new collection; edges are never mutated in place.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::geometry::{cmp_f32, BBox, Orientation, Point};
use crate::input::RulingPrimitive;

use super::tolerance::Tolerances;

/// Stroke style of a normalized edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeStyle {
    /// A continuous ruling
    Solid,
    /// Normalized from a dotted ruling
    Dotted,
    /// Linearized from a near-straight curve
    Curved,
}

/// A normalized ruling segment used as a table border candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Axis the edge runs along
    pub orientation: Orientation,
    /// Span start along the running axis
    pub lo: f32,
    /// Span end along the running axis
    pub hi: f32,
    /// Position on the cross axis (y for horizontal, x for vertical)
    pub pos: f32,
    /// Stroke style
    pub style: EdgeStyle,
    /// Set when the edge replaced a collapsed double ruling
    pub double: bool,
    /// Set when the edge was synthesized rather than detected
    pub synthetic: bool,
}

impl Edge {
    /// Create a detected (non-synthetic) edge.
    pub fn new(orientation: Orientation, lo: f32, hi: f32, pos: f32, style: EdgeStyle) -> Self {
        Self {
            orientation,
            lo: lo.min(hi),
            hi: lo.max(hi),
            pos,
            style,
            double: false,
            synthetic: false,
        }
    }

    /// Length of the edge along its running axis.
    pub fn length(&self) -> f32 {
        self.hi - self.lo
    }

    /// Bounding box of the edge (zero thickness on the cross axis).
    pub fn bbox(&self) -> BBox {
        match self.orientation {
            Orientation::Horizontal => BBox::new(self.lo, self.pos, self.hi, self.pos),
            Orientation::Vertical => BBox::new(self.pos, self.lo, self.pos, self.hi),
        }
    }

    /// Whether the spans of two same-orientation edges overlap, with slack.
    fn span_overlaps(&self, other: &Edge, slack: f32) -> bool {
        self.lo - slack <= other.hi && other.lo - slack <= self.hi
    }
}

/// Run the full detection pipeline over one page's ruling primitives.
pub fn detect(rulings: &[RulingPrimitive], tol: &Tolerances, config: &Config) -> Vec<Edge> {
    let (segments, dots) = orient_primitives(rulings, tol, config);
    let mut edges = segments;
    if config.dotted_line_flag {
        edges = normalize_dotted(edges, dots, tol);
    }
    if config.snap_flag {
        edges = snap_edges(edges, tol.main_frame);
    }
    edges = collapse_double_rulings(edges, config);
    if config.add_line_flag {
        edges = add_missing_borders(edges, tol.main_frame);
    }
    edges
}

/// Pass 1: classify raw primitives into oriented segments plus loose dots.
fn orient_primitives(
    rulings: &[RulingPrimitive],
    tol: &Tolerances,
    config: &Config,
) -> (Vec<Edge>, Vec<Point>) {
    let mut edges = Vec::new();
    let mut dots = Vec::new();

    for ruling in rulings {
        match ruling {
            RulingPrimitive::Line { p1, p2 } => {
                if let Some(edge) = orient_segment(*p1, *p2, tol.main_frame, EdgeStyle::Solid) {
                    edges.push(edge);
                } else {
                    log::debug!(
                        "skipping diagonal segment ({:.1},{:.1})-({:.1},{:.1})",
                        p1.x,
                        p1.y,
                        p2.x,
                        p2.y
                    );
                }
            }
            RulingPrimitive::Rect { bbox } => {
                edges.push(Edge::new(
                    Orientation::Horizontal,
                    bbox.x0,
                    bbox.x1,
                    bbox.y0,
                    EdgeStyle::Solid,
                ));
                edges.push(Edge::new(
                    Orientation::Horizontal,
                    bbox.x0,
                    bbox.x1,
                    bbox.y1,
                    EdgeStyle::Solid,
                ));
                edges.push(Edge::new(
                    Orientation::Vertical,
                    bbox.y0,
                    bbox.y1,
                    bbox.x0,
                    EdgeStyle::Solid,
                ));
                edges.push(Edge::new(
                    Orientation::Vertical,
                    bbox.y0,
                    bbox.y1,
                    bbox.x1,
                    EdgeStyle::Solid,
                ));
            }
            RulingPrimitive::Curve { points } => {
                if !config.curved_line_flag {
                    log::debug!("curved-line detection disabled, dropping curve");
                    continue;
                }
                match linearize_curve(points, tol.main_frame) {
                    Some(edge) => edges.push(edge),
                    None => log::debug!(
                        "curve with {} points deviates from its chord, dropped",
                        points.len()
                    ),
                }
            }
            RulingPrimitive::Dot { p } => dots.push(*p),
        }
    }

    (edges, dots)
}

/// Classify a segment as horizontal or vertical within the tolerance.
fn orient_segment(p1: Point, p2: Point, tol: f32, style: EdgeStyle) -> Option<Edge> {
    if (p1.y - p2.y).abs() <= tol {
        Some(Edge::new(
            Orientation::Horizontal,
            p1.x,
            p2.x,
            (p1.y + p2.y) / 2.0,
            style,
        ))
    } else if (p1.x - p2.x).abs() <= tol {
        Some(Edge::new(
            Orientation::Vertical,
            p1.y,
            p2.y,
            (p1.x + p2.x) / 2.0,
            style,
        ))
    } else {
        None
    }
}

/// Chord approximation: accept a curve as an edge when no sampled point
/// deviates from the first-to-last chord by more than the tolerance.
fn linearize_curve(points: &[Point], tol: f32) -> Option<Edge> {
    let first = points.first()?;
    let last = points.last()?;
    let chord_len = first.distance(last);
    if chord_len <= f32::EPSILON {
        return None;
    }

    let max_deviation = points
        .iter()
        .map(|p| point_to_chord_distance(p, first, last, chord_len))
        .fold(0.0f32, f32::max);
    if max_deviation > tol {
        return None;
    }

    orient_segment(*first, *last, tol, EdgeStyle::Curved)
}

fn point_to_chord_distance(p: &Point, a: &Point, b: &Point, chord_len: f32) -> f32 {
    ((b.x - a.x) * (a.y - p.y) - (a.x - p.x) * (b.y - a.y)).abs() / chord_len
}

/// A 1-D candidate for dotted-line chaining: a cross-axis position, a span
/// on the running axis, and the short segment it came from (`None` for a
/// bare dot).
#[derive(Debug, Clone, Copy)]
struct DotSample {
    cross: f32,
    lo: f32,
    hi: f32,
    source: Option<usize>,
}

/// Pass 2: dotted normalization. Dots and short dashes that fall within the
/// main-frame tolerance of a common line chain into one continuous edge.
/// A short segment that joins no chain is a real (if stubby) ruling and
/// goes back to the edge list untouched; only stray dots are discarded.
fn normalize_dotted(edges: Vec<Edge>, dots: Vec<Point>, tol: &Tolerances) -> Vec<Edge> {
    // A dash counts as "short" when it is no longer than a few tolerances;
    // longer segments are already real edges.
    let short_limit = tol.main_frame * 4.0;
    let max_dot_gap = tol.main_frame * 8.0;

    let (short, mut long): (Vec<Edge>, Vec<Edge>) =
        edges.into_iter().partition(|e| e.length() <= short_limit);

    // Each dot or short dash becomes a 1-D sample on both axes; chains are
    // built per orientation. Samples consumed horizontally are not offered
    // to the vertical pass, keeping the result deterministic.
    let mut samples: Vec<DotSample> = Vec::new();
    for (i, e) in short.iter().enumerate() {
        let sample = match e.orientation {
            Orientation::Horizontal => DotSample {
                cross: e.pos,
                lo: e.lo,
                hi: e.hi,
                source: Some(i),
            },
            // Treated as a dot at its midpoint for horizontal chains.
            Orientation::Vertical => DotSample {
                cross: (e.lo + e.hi) / 2.0,
                lo: e.pos,
                hi: e.pos,
                source: Some(i),
            },
        };
        samples.push(sample);
    }
    for d in &dots {
        samples.push(DotSample {
            cross: d.y,
            lo: d.x,
            hi: d.x,
            source: None,
        });
    }

    let (horizontal_chains, leftover) = chain_samples(samples, tol.main_frame, max_dot_gap);
    for (pos, lo, hi) in horizontal_chains {
        long.push(Edge::new(
            Orientation::Horizontal,
            lo,
            hi,
            pos,
            EdgeStyle::Dotted,
        ));
    }

    // Remaining samples flip axes for the vertical pass.
    let flipped: Vec<DotSample> = leftover
        .into_iter()
        .map(|s| DotSample {
            cross: (s.lo + s.hi) / 2.0,
            lo: s.cross,
            hi: s.cross,
            source: s.source,
        })
        .collect();
    let (vertical_chains, unchained) = chain_samples(flipped, tol.main_frame, max_dot_gap);
    for (pos, lo, hi) in vertical_chains {
        long.push(Edge::new(
            Orientation::Vertical,
            lo,
            hi,
            pos,
            EdgeStyle::Dotted,
        ));
    }

    let mut stray_dots = 0;
    for s in unchained {
        match s.source {
            Some(i) => long.push(short[i].clone()),
            None => stray_dots += 1,
        }
    }
    if stray_dots > 0 {
        log::debug!("{} stray dots formed no ruling, dropped", stray_dots);
    }

    long
}

/// Group samples by cross-axis position, then chain runs along the running
/// axis. Returns `(pos, lo, hi)` for chains of three or more samples, plus
/// every sample that joined no chain.
fn chain_samples(
    mut samples: Vec<DotSample>,
    band_tol: f32,
    max_gap: f32,
) -> (Vec<(f32, f32, f32)>, Vec<DotSample>) {
    samples.sort_by(|a, b| cmp_f32(a.cross, b.cross).then_with(|| cmp_f32(a.lo, b.lo)));

    let mut chains = Vec::new();
    let mut leftover = Vec::new();

    let mut i = 0;
    while i < samples.len() {
        // Collect the band of samples sharing a cross-axis position.
        let mut j = i + 1;
        while j < samples.len() && (samples[j].cross - samples[j - 1].cross).abs() <= band_tol {
            j += 1;
        }
        let band = &samples[i..j];

        // Chain along the running axis.
        let mut run: Vec<DotSample> = Vec::new();
        let mut flush = |run: &mut Vec<DotSample>,
                         chains: &mut Vec<(f32, f32, f32)>,
                         leftover: &mut Vec<DotSample>| {
            if run.len() >= 3 {
                let pos = run.iter().map(|s| s.cross).sum::<f32>() / run.len() as f32;
                let lo = run.iter().map(|s| s.lo).fold(f32::INFINITY, f32::min);
                let hi = run.iter().map(|s| s.hi).fold(f32::NEG_INFINITY, f32::max);
                chains.push((pos, lo, hi));
            } else {
                leftover.append(run);
            }
            run.clear();
        };

        let mut band_sorted: Vec<DotSample> = band.to_vec();
        band_sorted.sort_by(|a, b| cmp_f32(a.lo, b.lo));
        for s in band_sorted {
            if let Some(prev) = run.last() {
                if s.lo - prev.hi > max_gap {
                    flush(&mut run, &mut chains, &mut leftover);
                }
            }
            run.push(s);
        }
        flush(&mut run, &mut chains, &mut leftover);

        i = j;
    }

    (chains, leftover)
}

/// Pass 3: snapping. Cross-axis positions within the tolerance collapse onto
/// their mean, and collinear spans that touch or overlap merge.
pub fn snap_edges(edges: Vec<Edge>, tol: f32) -> Vec<Edge> {
    let mut out = Vec::with_capacity(edges.len());
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let mut group: Vec<Edge> = edges
            .iter()
            .filter(|e| e.orientation == orientation)
            .cloned()
            .collect();
        group.sort_by(|a, b| cmp_f32(a.pos, b.pos).then_with(|| cmp_f32(a.lo, b.lo)));

        // Chain-cluster positions.
        let mut i = 0;
        while i < group.len() {
            let mut j = i + 1;
            while j < group.len() && group[j].pos - group[j - 1].pos <= tol {
                j += 1;
            }
            let cluster = &group[i..j];
            let pos = cluster.iter().map(|e| e.pos).sum::<f32>() / cluster.len() as f32;

            // Merge overlapping spans at the shared position.
            let mut spans: Vec<Edge> = cluster
                .iter()
                .map(|e| {
                    let mut e = e.clone();
                    e.pos = pos;
                    e
                })
                .collect();
            spans.sort_by(|a, b| cmp_f32(a.lo, b.lo));
            let mut merged: Vec<Edge> = Vec::new();
            for e in spans {
                match merged.last_mut() {
                    Some(last) if e.lo - last.hi <= tol => {
                        last.hi = last.hi.max(e.hi);
                        if last.style != e.style {
                            last.style = EdgeStyle::Solid;
                        }
                        last.double |= e.double;
                    }
                    _ => merged.push(e),
                }
            }
            out.extend(merged);
            i = j;
        }
    }
    out
}

/// Pass 4: double-ruling collapse. Same-orientation pairs with overlapping
/// spans and a cross-axis gap strictly inside the configured window merge
/// into one midpoint edge tagged `double`. Horizontal pairs (whose
/// separation is vertical) honor the additional vertical bound.
pub fn collapse_double_rulings(edges: Vec<Edge>, config: &Config) -> Vec<Edge> {
    let min = config.min_double_line_tolerance;
    let max = config.max_double_line_tolerance;
    let vmax = config.vertical_double_line_tolerance;

    let mut out = Vec::with_capacity(edges.len());
    for orientation in [Orientation::Horizontal, Orientation::Vertical] {
        let mut group: Vec<Edge> = edges
            .iter()
            .filter(|e| e.orientation == orientation)
            .cloned()
            .collect();
        group.sort_by(|a, b| cmp_f32(a.pos, b.pos).then_with(|| cmp_f32(a.lo, b.lo)));

        let mut consumed = vec![false; group.len()];
        for i in 0..group.len() {
            if consumed[i] {
                continue;
            }
            let mut merged: Option<Edge> = None;
            for j in (i + 1)..group.len() {
                if consumed[j] {
                    continue;
                }
                let gap = group[j].pos - group[i].pos;
                if gap >= max {
                    break;
                }
                let within = gap > min
                    && gap < max
                    && (orientation == Orientation::Vertical || gap < vmax)
                    && group[i].span_overlaps(&group[j], 0.0);
                if within {
                    let mut e = group[i].clone();
                    e.pos = (group[i].pos + group[j].pos) / 2.0;
                    e.lo = group[i].lo.min(group[j].lo);
                    e.hi = group[i].hi.max(group[j].hi);
                    e.double = true;
                    if group[i].style != group[j].style {
                        e.style = EdgeStyle::Solid;
                    }
                    consumed[j] = true;
                    merged = Some(e);
                    log::debug!(
                        "collapsed double ruling at {:.2}/{:.2} -> {:.2}",
                        group[i].pos,
                        group[j].pos,
                        (group[i].pos + group[j].pos) / 2.0
                    );
                    break;
                }
            }
            out.push(merged.unwrap_or_else(|| group[i].clone()));
            consumed[i] = true;
        }
    }
    out
}

/// Pass 5: border synthesis. When at least two edges exist per orientation,
/// outer borders missing from the grid extent are added as synthetic edges.
pub fn add_missing_borders(mut edges: Vec<Edge>, tol: f32) -> Vec<Edge> {
    let h: Vec<&Edge> = edges
        .iter()
        .filter(|e| e.orientation == Orientation::Horizontal)
        .collect();
    let v: Vec<&Edge> = edges
        .iter()
        .filter(|e| e.orientation == Orientation::Vertical)
        .collect();
    if h.len() < 2 || v.len() < 2 {
        return edges;
    }

    let top = h.iter().map(|e| e.pos).fold(f32::INFINITY, f32::min);
    let bottom = h.iter().map(|e| e.pos).fold(f32::NEG_INFINITY, f32::max);
    let left = v.iter().map(|e| e.pos).fold(f32::INFINITY, f32::min);
    let right = v.iter().map(|e| e.pos).fold(f32::NEG_INFINITY, f32::max);

    let v_lo = v.iter().map(|e| e.lo).fold(f32::INFINITY, f32::min);
    let v_hi = v.iter().map(|e| e.hi).fold(f32::NEG_INFINITY, f32::max);
    let h_lo = h.iter().map(|e| e.lo).fold(f32::INFINITY, f32::min);
    let h_hi = h.iter().map(|e| e.hi).fold(f32::NEG_INFINITY, f32::max);

    let mut synth = Vec::new();
    // Vertical extent implies top/bottom borders where no horizontal edge sits.
    for pos in [v_lo, v_hi] {
        if !h.iter().any(|e| (e.pos - pos).abs() <= tol)
            && (pos < top - tol || pos > bottom + tol)
        {
            let mut e = Edge::new(Orientation::Horizontal, left, right, pos, EdgeStyle::Solid);
            e.synthetic = true;
            synth.push(e);
        }
    }
    for pos in [h_lo, h_hi] {
        if !v.iter().any(|e| (e.pos - pos).abs() <= tol)
            && (pos < left - tol || pos > right + tol)
        {
            let mut e = Edge::new(Orientation::Vertical, top, bottom, pos, EdgeStyle::Solid);
            e.synthetic = true;
            synth.push(e);
        }
    }

    if !synth.is_empty() {
        log::debug!("synthesized {} missing border edges", synth.len());
        edges.extend(synth);
    }
    edges
}
