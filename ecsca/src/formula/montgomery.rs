//! Montgomery x-only formulas, `b*y^2 = x^3 + a*x^2 + x`, with `a24 = (a + 2) / 4`.

use super::{Evaluator, Formula, FormulaKind, OpCount};
use crate::error::EcError;
use crate::model::CoordinateModel;
use crate::modular::Mod;

pub(crate) const XZ: &[Formula] = &[
    Formula {
        name: "dbl-1987-m",
        kind: FormulaKind::Dbl,
        model: CoordinateModel::MONTGOM_XZ,
        parameters: &["a24"],
        ops: OpCount {
            add: 2,
            sub: 2,
            mul: 3,
            sqr: 2,
            ..OpCount::NONE
        },
        eval: dbl_1987_m,
    },
    Formula {
        name: "dadd-1987-m",
        kind: FormulaKind::Dadd,
        model: CoordinateModel::MONTGOM_XZ,
        parameters: &[],
        ops: OpCount {
            add: 3,
            sub: 3,
            mul: 4,
            sqr: 2,
            ..OpCount::NONE
        },
        eval: dadd_1987_m,
    },
    Formula {
        name: "ladd-1987-m",
        kind: FormulaKind::Ladd,
        model: CoordinateModel::MONTGOM_XZ,
        parameters: &["a24"],
        ops: OpCount {
            add: 4,
            sub: 4,
            mul: 7,
            sqr: 4,
            ..OpCount::NONE
        },
        eval: ladd_1987_m,
    },
    Formula {
        name: "scale",
        kind: FormulaKind::Scale,
        model: CoordinateModel::MONTGOM_XZ,
        parameters: &[],
        ops: OpCount {
            mul: 1,
            inv: 1,
            ..OpCount::NONE
        },
        eval: scale,
    },
];

fn dbl_1987_m(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, z1) = (&p[0][0], &p[0][1]);
    let a24 = e.param("a24")?;

    let a = e.add(x1, z1)?;
    let aa = e.sqr(&a)?;
    let b = e.sub(x1, z1)?;
    let bb = e.sqr(&b)?;
    let c = e.sub(&aa, &bb)?;
    let x3 = e.mul(&aa, &bb)?;
    let t0 = e.mul(&a24, &c)?;
    let t1 = e.add(&bb, &t0)?;
    let z3 = e.mul(&c, &t1)?;

    Ok(vec![vec![x3, z3]])
}

// P1 is the difference P3 - P2
fn dadd_1987_m(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, z1) = (&p[0][0], &p[0][1]);
    let (x2, z2) = (&p[1][0], &p[1][1]);
    let (x3, z3) = (&p[2][0], &p[2][1]);

    let a = e.add(x2, z2)?;
    let b = e.sub(x2, z2)?;
    let c = e.add(x3, z3)?;
    let d = e.sub(x3, z3)?;
    let da = e.mul(&d, &a)?;
    let cb = e.mul(&c, &b)?;
    let t0 = e.add(&da, &cb)?;
    let t1 = e.sqr(&t0)?;
    let x5 = e.mul(z1, &t1)?;
    let t2 = e.sub(&da, &cb)?;
    let t3 = e.sqr(&t2)?;
    let z5 = e.mul(x1, &t3)?;

    Ok(vec![vec![x5, z5]])
}

fn ladd_1987_m(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, z1) = (&p[0][0], &p[0][1]);
    let (x2, z2) = (&p[1][0], &p[1][1]);
    let (x3, z3) = (&p[2][0], &p[2][1]);
    let a24 = e.param("a24")?;

    let a = e.add(x2, z2)?;
    let aa = e.sqr(&a)?;
    let b = e.sub(x2, z2)?;
    let bb = e.sqr(&b)?;
    let diff = e.sub(&aa, &bb)?;
    let c = e.add(x3, z3)?;
    let d = e.sub(x3, z3)?;
    let da = e.mul(&d, &a)?;
    let cb = e.mul(&c, &b)?;
    let t0 = e.add(&da, &cb)?;
    let t1 = e.sqr(&t0)?;
    let x5 = e.mul(z1, &t1)?;
    let t2 = e.sub(&da, &cb)?;
    let t3 = e.sqr(&t2)?;
    let z5 = e.mul(x1, &t3)?;
    let x4 = e.mul(&aa, &bb)?;
    let t4 = e.mul(&a24, &diff)?;
    let t5 = e.add(&bb, &t4)?;
    let z4 = e.mul(&diff, &t5)?;

    Ok(vec![vec![x4, z4], vec![x5, z5]])
}

fn scale(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, z1) = (&p[0][0], &p[0][1]);

    let a = e.inv(z1)?;
    let x3 = e.mul(x1, &a)?;

    Ok(vec![vec![x3, e.int(1)?]])
}
