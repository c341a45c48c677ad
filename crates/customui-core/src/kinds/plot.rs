//! 2D plot model: named curves, axis ranges and interaction settings.
//!
//! Only the data side lives here; drawing belongs to the toolkit.

use crate::error::UiError;
use crate::event::{Event, UserInput};
use crate::kinds::{Behavior, Emit, value};
use crate::markup::Element;
use crate::mutation::Mutation;
use crate::query::{Query, Value};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveKind {
    /// Samples over time; x is the timestamp and must not decrease.
    Time,
    XY,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CurveStyle {
    Line,
    Scatter,
    Step,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn union(self, other: Range) -> Range {
        Range {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    fn of(values: impl Iterator<Item = f64>) -> Option<Range> {
        values.fold(None, |acc, v| {
            let r = Range { min: v, max: v };
            Some(acc.map_or(r, |a: Range| a.union(r)))
        })
    }
}

impl Default for Range {
    fn default() -> Self {
        Self { min: 0.0, max: 1.0 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MouseOptions {
    pub pan_x: bool,
    pub pan_y: bool,
    pub zoom_x: bool,
    pub zoom_y: bool,
}

impl Default for MouseOptions {
    fn default() -> Self {
        Self {
            pan_x: true,
            pan_y: true,
            zoom_x: true,
            zoom_y: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Curve {
    pub name: String,
    pub kind: CurveKind,
    pub color: [u8; 3],
    pub style: CurveStyle,
    pub points: Vec<(f64, f64)>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum PlotOp {
    AddCurve {
        name: String,
        kind: CurveKind,
        color: [u8; 3],
        style: CurveStyle,
    },
    AddTimePoints {
        curve: String,
        t: Vec<f64>,
        y: Vec<f64>,
    },
    AddXYPoints {
        curve: String,
        x: Vec<f64>,
        y: Vec<f64>,
    },
    ClearCurve(String),
    RemoveCurve(String),
    SetRanges {
        x: Range,
        y: Range,
    },
    GrowRanges {
        x: Range,
        y: Range,
    },
    SetLabels {
        x: String,
        y: String,
    },
    RescaleAxes {
        curve: String,
        only_enlarge_x: bool,
        only_enlarge_y: bool,
    },
    SetMouseOptions(MouseOptions),
    SetLegendVisible(bool),
    Replot,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Plot {
    pub curves: Vec<Curve>,
    pub x_range: Range,
    pub y_range: Range,
    pub x_label: String,
    pub y_label: String,
    pub legend_visible: bool,
    pub mouse: MouseOptions,
    pub background: [u8; 3],
    pub foreground: [u8; 3],
    /// Bumped on every explicit replot request.
    pub replots: u64,
    pub onclick: Option<String>,
    pub onlegendclick: Option<String>,
}

impl Plot {
    pub fn parse(el: &Element) -> Self {
        let color = |name, default: [u8; 3]| match el.int_list(name, 3) {
            Some(c) => [c[0], c[1], c[2]].map(|v| v.clamp(0, 255) as u8),
            None => default,
        };
        Self {
            curves: Vec::new(),
            x_range: Range::default(),
            y_range: Range::default(),
            x_label: el.str_or("x-label", ""),
            y_label: el.str_or("y-label", ""),
            legend_visible: el.bool_or("legend", false),
            mouse: MouseOptions::default(),
            background: color("background-color", [255, 255, 255]),
            foreground: color("foreground-color", [0, 0, 0]),
            replots: 0,
            onclick: el.handler("onclick"),
            onlegendclick: el.handler("onlegendclick"),
        }
    }

    pub fn curve(&self, name: &str) -> Option<&Curve> {
        self.curves.iter().find(|c| c.name == name)
    }

    fn curve_mut(&mut self, name: &str) -> Result<&mut Curve, UiError> {
        self.curves
            .iter_mut()
            .find(|c| c.name == name)
            .ok_or_else(|| UiError::InvalidArgument(format!("no curve named {name:?}")))
    }

    fn add_points(
        &mut self,
        name: &str,
        kind: CurveKind,
        xs: &[f64],
        ys: &[f64],
    ) -> Result<(), UiError> {
        if xs.len() != ys.len() {
            return Err(UiError::InvalidArgument(format!(
                "point vectors differ in length ({} vs {})",
                xs.len(),
                ys.len()
            )));
        }
        let curve = self.curve_mut(name)?;
        if curve.kind != kind {
            return Err(UiError::InvalidArgument(format!(
                "curve {name:?} is a {:?} curve",
                curve.kind
            )));
        }
        if kind == CurveKind::Time {
            let mut last = curve.points.last().map_or(f64::NEG_INFINITY, |p| p.0);
            for t in xs {
                if *t < last {
                    return Err(UiError::InvalidArgument(
                        "time samples must not go backwards".into(),
                    ));
                }
                last = *t;
            }
        }
        curve
            .points
            .extend(xs.iter().copied().zip(ys.iter().copied()));
        Ok(())
    }

    pub fn run(&mut self, op: &PlotOp) -> Result<(), UiError> {
        match op {
            PlotOp::AddCurve {
                name,
                kind,
                color,
                style,
            } => {
                if self.curve(name).is_some() {
                    return Err(UiError::InvalidArgument(format!(
                        "curve {name:?} already exists"
                    )));
                }
                self.curves.push(Curve {
                    name: name.clone(),
                    kind: *kind,
                    color: *color,
                    style: *style,
                    points: Vec::new(),
                });
            }
            PlotOp::AddTimePoints { curve, t, y } => {
                self.add_points(curve, CurveKind::Time, t, y)?
            }
            PlotOp::AddXYPoints { curve, x, y } => self.add_points(curve, CurveKind::XY, x, y)?,
            PlotOp::ClearCurve(name) => self.curve_mut(name)?.points.clear(),
            PlotOp::RemoveCurve(name) => {
                self.curve_mut(name)?;
                self.curves.retain(|c| &c.name != name);
            }
            PlotOp::SetRanges { x, y } => {
                self.x_range = *x;
                self.y_range = *y;
            }
            PlotOp::GrowRanges { x, y } => {
                self.x_range = self.x_range.union(*x);
                self.y_range = self.y_range.union(*y);
            }
            PlotOp::SetLabels { x, y } => {
                self.x_label = x.clone();
                self.y_label = y.clone();
            }
            PlotOp::RescaleAxes {
                curve,
                only_enlarge_x,
                only_enlarge_y,
            } => {
                let points = &self.curve_mut(curve)?.points;
                let xr = Range::of(points.iter().map(|p| p.0));
                let yr = Range::of(points.iter().map(|p| p.1));
                if let Some(xr) = xr {
                    self.x_range = if *only_enlarge_x {
                        self.x_range.union(xr)
                    } else {
                        xr
                    };
                }
                if let Some(yr) = yr {
                    self.y_range = if *only_enlarge_y {
                        self.y_range.union(yr)
                    } else {
                        yr
                    };
                }
            }
            PlotOp::SetMouseOptions(options) => self.mouse = *options,
            PlotOp::SetLegendVisible(visible) => self.legend_visible = *visible,
            PlotOp::Replot => self.replots += 1,
        }
        Ok(())
    }
}

impl Behavior for Plot {
    fn apply(&mut self, mutation: &Mutation) -> Option<Result<(), UiError>> {
        match mutation {
            Mutation::Plot(op) => Some(self.run(op)),
            _ => None,
        }
    }

    fn input(&mut self, input: UserInput) -> Option<Emit> {
        match input {
            UserInput::PlottableClicked { curve, index } => {
                let (x, y) = *self.curve(&curve)?.points.get(index)?;
                Some(Emit::new(
                    Event::PlottableClicked { curve, index, x, y },
                    &self.onclick,
                ))
            }
            UserInput::LegendClicked { curve } => {
                self.curve(&curve)?;
                Some(Emit::new(Event::LegendClicked { curve }, &self.onlegendclick))
            }
            _ => None,
        }
    }

    fn query(&self, query: &Query) -> Option<Result<Value, UiError>> {
        match query {
            Query::CurveNames => value(Value::List(
                self.curves.iter().map(|c| c.name.clone()).collect(),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_curve(kind: CurveKind) -> Plot {
        let mut p = Plot::parse(&Element::new("plot"));
        p.run(&PlotOp::AddCurve {
            name: "c".into(),
            kind,
            color: [255, 0, 0],
            style: CurveStyle::Line,
        })
        .unwrap();
        p
    }

    #[test]
    fn test_duplicate_curve_rejected() {
        let mut p = with_curve(CurveKind::XY);
        let again = PlotOp::AddCurve {
            name: "c".into(),
            kind: CurveKind::XY,
            color: [0, 0, 0],
            style: CurveStyle::Scatter,
        };
        assert!(p.run(&again).is_err());
    }

    #[test]
    fn test_points_checked_against_kind_and_length() {
        let mut p = with_curve(CurveKind::Time);
        assert!(p
            .run(&PlotOp::AddXYPoints {
                curve: "c".into(),
                x: vec![1.0],
                y: vec![1.0],
            })
            .is_err());
        assert!(p
            .run(&PlotOp::AddTimePoints {
                curve: "c".into(),
                t: vec![1.0, 2.0],
                y: vec![1.0],
            })
            .is_err());
        p.run(&PlotOp::AddTimePoints {
            curve: "c".into(),
            t: vec![0.0, 1.0, 2.0],
            y: vec![5.0, -1.0, 3.0],
        })
        .unwrap();
        assert_eq!(p.curve("c").unwrap().points.len(), 3);
    }

    #[test]
    fn test_rescale_axes() {
        let mut p = with_curve(CurveKind::XY);
        p.run(&PlotOp::AddXYPoints {
            curve: "c".into(),
            x: vec![-2.0, 4.0],
            y: vec![10.0, 20.0],
        })
        .unwrap();
        p.run(&PlotOp::RescaleAxes {
            curve: "c".into(),
            only_enlarge_x: false,
            only_enlarge_y: true,
        })
        .unwrap();
        assert_eq!(p.x_range, Range::new(-2.0, 4.0));
        assert_eq!(p.y_range, Range::new(0.0, 20.0));
    }

    #[test]
    fn test_click_reports_point() {
        let mut p = with_curve(CurveKind::XY);
        p.run(&PlotOp::AddXYPoints {
            curve: "c".into(),
            x: vec![1.5],
            y: vec![2.5],
        })
        .unwrap();
        let e = p
            .input(UserInput::PlottableClicked {
                curve: "c".into(),
                index: 0,
            })
            .unwrap();
        assert_eq!(
            e.event,
            Event::PlottableClicked {
                curve: "c".into(),
                index: 0,
                x: 1.5,
                y: 2.5
            }
        );
        assert!(p
            .input(UserInput::PlottableClicked {
                curve: "c".into(),
                index: 7
            })
            .is_none());
    }
}
