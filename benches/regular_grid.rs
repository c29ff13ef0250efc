use criterion::{criterion_group, criterion_main, Criterion};
use sgregular::{errors::SGError, grids::{linear_grid::LinearGrid, sparse_grid::SparseGrid}};

fn build_six_d_grid() -> Result<LinearGrid, SGError>
{
    let mut grid = LinearGrid::new(6, 5)?;
    grid.generate_points()?;
    let f = |x: &[f64]| -> f64
    {
        x.iter().map(|x| x * x * x).sum()
    };
    grid.update_values(&f);
    grid.hierarchize()?;
    Ok(grid)
}

fn six_d(grid: &LinearGrid) -> Result<(), SGError>
{
    let x = [0.3, 0.1, 0.2, 0.1, 0.4, 0.7].repeat(1000);
    let _value = grid.evaluate_batch(&x)?;
    Ok(())
}

fn run_six_d(c: &mut Criterion)
{
    let grid = build_six_d_grid().unwrap();
    c.bench_function("6d evaluate_batch", |b| b.iter(|| six_d(&grid).unwrap()));
    c.bench_function("6d hierarchize", |b| b.iter(|| build_six_d_grid().unwrap()));
}

criterion_group!(benches, run_six_d);
criterion_main!(benches);
