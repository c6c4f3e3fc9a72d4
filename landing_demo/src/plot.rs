use std::path::Path;
use plotters::prelude::*;
use anyhow::Result;

/// Samples of one landing run.
pub struct Record
{
    /// Solve time in ms per tick, `None` if the solve failed.
    pub solve_ms: Vec<Option<f64>>,
    /// Altitude per tick, including the initial one.
    pub altitude: Vec<f64>,
}

fn upper(v: impl Iterator<Item = f64>) -> f64
{
    v.fold(0., f64::max) * 1.1 + 1e-3
}

pub fn plot_timings(path: &Path, records: &[Record]) -> Result<()>
{
    let ticks = records.iter().map(|r| r.solve_ms.len()).max().unwrap_or(0);
    let y_max = upper(records.iter().flat_map(|r| r.solve_ms.iter().flatten().copied()));

    let root = SVGBackend::new(path, (480, 360)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(
            0.0..ticks.max(1) as f64,
            0.0..y_max,
        )?;

    chart.configure_mesh()
        .x_labels(6)
        .y_labels(5)
        .x_desc("tick")
        .y_desc("solve time [ms]")
        .disable_mesh()
        .draw()?;

    for (i, r) in records.iter().enumerate() {
        chart.draw_series(
            PointSeries::of_element(
                r.solve_ms.iter().enumerate()
                    .filter_map(|(t, ms)| ms.map(|ms| (t as f64, ms))),
                3,
                Palette99::pick(i).filled(),
                &|coord, size, style| {
                    EmptyElement::at(coord)
                        + Circle::new((0, 0), size, style)
                }
            )
        )?;

        // failed solves on the axis
        chart.draw_series(
            PointSeries::of_element(
                r.solve_ms.iter().enumerate()
                    .filter(|(_, ms)| ms.is_none())
                    .map(|(t, _)| (t as f64, 0.)),
                5,
                RED.mix(0.5).stroke_width(2),
                &|coord, size, style| {
                    EmptyElement::at(coord)
                        + Cross::new((0, 0), size, style)
                }
            )
        )?;
    }

    root.present()?;
    Ok(())
}

pub fn plot_altitude(path: &Path, records: &[Record], h: f64) -> Result<()>
{
    let ticks = records.iter().map(|r| r.altitude.len()).max().unwrap_or(0);
    let y_max = upper(records.iter().flat_map(|r| r.altitude.iter().copied()));

    let root = SVGBackend::new(path, (480, 360)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .margin(30)
        .x_label_area_size(35)
        .y_label_area_size(45)
        .build_cartesian_2d(
            0.0..(ticks.max(2) - 1) as f64 * h,
            0.0..y_max,
        )?;

    chart.configure_mesh()
        .x_labels(6)
        .y_labels(5)
        .x_desc("time [s]")
        .y_desc("altitude [m]")
        .disable_mesh()
        .draw()?;

    for (i, r) in records.iter().enumerate() {
        chart.draw_series(
            LineSeries::new(
                r.altitude.iter().enumerate().map(|(t, &z)| (t as f64 * h, z)),
                Palette99::pick(i).stroke_width(2).filled()
            ).point_size(2)
        )?;
    }

    root.present()?;
    Ok(())
}
