//! Short Weierstrass formulas, `y^2 = x^3 + a*x + b`.

use super::{Evaluator, Formula, FormulaKind, OpCount};
use crate::error::EcError;
use crate::model::CoordinateModel;
use crate::modular::Mod;

pub(crate) const PROJECTIVE: &[Formula] = &[
    Formula {
        name: "add-1998-cmo",
        kind: FormulaKind::Add,
        model: CoordinateModel::SHORTW_PROJECTIVE,
        parameters: &[],
        ops: OpCount {
            add: 1,
            sub: 6,
            mul: 12,
            sqr: 2,
            ..OpCount::NONE
        },
        eval: add_1998_cmo,
    },
    Formula {
        name: "add-2015-rcb",
        kind: FormulaKind::Add,
        model: CoordinateModel::SHORTW_PROJECTIVE,
        parameters: &["a", "b3"],
        ops: OpCount {
            add: 17,
            sub: 6,
            mul: 17,
            ..OpCount::NONE
        },
        eval: add_2015_rcb,
    },
    Formula {
        name: "dbl-1998-cmo",
        kind: FormulaKind::Dbl,
        model: CoordinateModel::SHORTW_PROJECTIVE,
        parameters: &["a"],
        ops: OpCount {
            add: 7,
            sub: 5,
            mul: 6,
            sqr: 6,
            ..OpCount::NONE
        },
        eval: dbl_1998_cmo,
    },
    Formula {
        name: "neg",
        kind: FormulaKind::Neg,
        model: CoordinateModel::SHORTW_PROJECTIVE,
        parameters: &[],
        ops: OpCount {
            neg: 1,
            ..OpCount::NONE
        },
        eval: neg,
    },
    Formula {
        name: "z",
        kind: FormulaKind::Scale,
        model: CoordinateModel::SHORTW_PROJECTIVE,
        parameters: &[],
        ops: OpCount {
            mul: 2,
            inv: 1,
            ..OpCount::NONE
        },
        eval: z_projective,
    },
];

pub(crate) const JACOBIAN: &[Formula] = &[
    Formula {
        name: "add-1998-cmo-2",
        kind: FormulaKind::Add,
        model: CoordinateModel::SHORTW_JACOBIAN,
        parameters: &[],
        ops: OpCount {
            add: 1,
            sub: 6,
            mul: 12,
            sqr: 4,
            ..OpCount::NONE
        },
        eval: add_1998_cmo_2,
    },
    Formula {
        name: "dbl-1998-cmo-2",
        kind: FormulaKind::Dbl,
        model: CoordinateModel::SHORTW_JACOBIAN,
        parameters: &["a"],
        ops: OpCount {
            add: 10,
            sub: 3,
            mul: 4,
            sqr: 6,
            ..OpCount::NONE
        },
        eval: dbl_1998_cmo_2,
    },
    Formula {
        name: "neg",
        kind: FormulaKind::Neg,
        model: CoordinateModel::SHORTW_JACOBIAN,
        parameters: &[],
        ops: OpCount {
            neg: 1,
            ..OpCount::NONE
        },
        eval: neg,
    },
    Formula {
        name: "z",
        kind: FormulaKind::Scale,
        model: CoordinateModel::SHORTW_JACOBIAN,
        parameters: &[],
        ops: OpCount {
            mul: 3,
            sqr: 1,
            inv: 1,
            ..OpCount::NONE
        },
        eval: z_jacobian,
    },
];

fn add_1998_cmo(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, y1, z1) = (&p[0][0], &p[0][1], &p[0][2]);
    let (x2, y2, z2) = (&p[1][0], &p[1][1], &p[1][2]);

    let y1z2 = e.mul(y1, z2)?;
    let x1z2 = e.mul(x1, z2)?;
    let z1z2 = e.mul(z1, z2)?;
    let t0 = e.mul(y2, z1)?;
    let u = e.sub(&t0, &y1z2)?;
    let uu = e.sqr(&u)?;
    let t1 = e.mul(x2, z1)?;
    let v = e.sub(&t1, &x1z2)?;
    let vv = e.sqr(&v)?;
    let vvv = e.mul(&v, &vv)?;
    let r = e.mul(&vv, &x1z2)?;
    let t2 = e.mul(&uu, &z1z2)?;
    let t3 = e.sub(&t2, &vvv)?;
    let t4 = e.add(&r, &r)?;
    let a = e.sub(&t3, &t4)?;
    let x3 = e.mul(&v, &a)?;
    let t5 = e.sub(&r, &a)?;
    let t6 = e.mul(&u, &t5)?;
    let t7 = e.mul(&vvv, &y1z2)?;
    let y3 = e.sub(&t6, &t7)?;
    let z3 = e.mul(&vvv, &z1z2)?;

    Ok(vec![vec![x3, y3, z3]])
}

/// Complete addition (Renes, Costello, Batina), also valid for doubling
/// and for the point at infinity.
fn add_2015_rcb(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, y1, z1) = (&p[0][0], &p[0][1], &p[0][2]);
    let (x2, y2, z2) = (&p[1][0], &p[1][1], &p[1][2]);
    let a = e.param("a")?;
    let b3 = e.param("b3")?;

    let t0 = e.mul(x1, x2)?;
    let t1 = e.mul(y1, y2)?;
    let t2 = e.mul(z1, z2)?;
    let t3 = e.add(x1, y1)?;
    let t4 = e.add(x2, y2)?;

    let t3 = e.mul(&t3, &t4)?;
    let t4 = e.add(&t0, &t1)?;
    let t3 = e.sub(&t3, &t4)?;
    let t4 = e.add(x1, z1)?;
    let t5 = e.add(x2, z2)?;

    let t4 = e.mul(&t4, &t5)?;
    let t5 = e.add(&t0, &t2)?;
    let t4 = e.sub(&t4, &t5)?;
    let t5 = e.add(y1, z1)?;
    let sum_x = e.add(y2, z2)?;

    let t5 = e.mul(&t5, &sum_x)?;
    let sum_x = e.add(&t1, &t2)?;
    let t5 = e.sub(&t5, &sum_x)?;
    let sum_z = e.mul(&a, &t4)?;
    let sum_x = e.mul(&b3, &t2)?;

    let sum_z = e.add(&sum_z, &sum_x)?;
    let sum_x = e.sub(&t1, &sum_z)?;
    let sum_z = e.add(&sum_z, &t1)?;
    let sum_y = e.mul(&sum_x, &sum_z)?;
    let t1 = e.add(&t0, &t0)?;

    let t1 = e.add(&t1, &t0)?;
    let t2 = e.mul(&a, &t2)?;
    let t4 = e.mul(&t4, &b3)?;
    let t1 = e.add(&t1, &t2)?;
    let t2 = e.sub(&t0, &t2)?;

    let t2 = e.mul(&t2, &a)?;
    let t4 = e.add(&t4, &t2)?;
    let t0 = e.mul(&t1, &t4)?;
    let sum_y = e.add(&sum_y, &t0)?;
    let t0 = e.mul(&t4, &t5)?;

    let sum_x = e.mul(&sum_x, &t3)?;
    let sum_x = e.sub(&sum_x, &t0)?;
    let t0 = e.mul(&t1, &t3)?;
    let sum_z = e.mul(&sum_z, &t5)?;
    let sum_z = e.add(&sum_z, &t0)?;

    Ok(vec![vec![sum_x, sum_y, sum_z]])
}

fn dbl_1998_cmo(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, y1, z1) = (&p[0][0], &p[0][1], &p[0][2]);
    let a = e.param("a")?;

    let xx = e.sqr(x1)?;
    let zz = e.sqr(z1)?;
    let t0 = e.mul(&a, &zz)?;
    let t1 = e.add(&xx, &xx)?;
    let t2 = e.add(&t1, &xx)?;
    let w = e.add(&t0, &t2)?;
    let t3 = e.mul(y1, z1)?;
    let s = e.add(&t3, &t3)?;
    let ss = e.sqr(&s)?;
    let sss = e.mul(&s, &ss)?;
    let r = e.mul(y1, &s)?;
    let rr = e.sqr(&r)?;
    let t4 = e.add(x1, &r)?;
    let t5 = e.sqr(&t4)?;
    let t6 = e.sub(&t5, &xx)?;
    let b = e.sub(&t6, &rr)?;
    let t7 = e.sqr(&w)?;
    let t8 = e.add(&b, &b)?;
    let h = e.sub(&t7, &t8)?;
    let x3 = e.mul(&h, &s)?;
    let t9 = e.sub(&b, &h)?;
    let t10 = e.mul(&w, &t9)?;
    let t11 = e.add(&rr, &rr)?;
    let y3 = e.sub(&t10, &t11)?;

    Ok(vec![vec![x3, y3, sss]])
}

fn neg(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, y1, z1) = (&p[0][0], &p[0][1], &p[0][2]);
    let y3 = e.neg(y1);
    Ok(vec![vec![x1.clone(), y3, z1.clone()]])
}

fn z_projective(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, y1, z1) = (&p[0][0], &p[0][1], &p[0][2]);

    let a = e.inv(z1)?;
    let x3 = e.mul(&a, x1)?;
    let y3 = e.mul(&a, y1)?;

    Ok(vec![vec![x3, y3, e.int(1)?]])
}

fn add_1998_cmo_2(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, y1, z1) = (&p[0][0], &p[0][1], &p[0][2]);
    let (x2, y2, z2) = (&p[1][0], &p[1][1], &p[1][2]);

    let z1z1 = e.sqr(z1)?;
    let z2z2 = e.sqr(z2)?;
    let u1 = e.mul(x1, &z2z2)?;
    let u2 = e.mul(x2, &z1z1)?;
    let t0 = e.mul(y1, z2)?;
    let s1 = e.mul(&t0, &z2z2)?;
    let t1 = e.mul(y2, z1)?;
    let s2 = e.mul(&t1, &z1z1)?;
    let h = e.sub(&u2, &u1)?;
    let hh = e.sqr(&h)?;
    let hhh = e.mul(&h, &hh)?;
    let r = e.sub(&s2, &s1)?;
    let v = e.mul(&u1, &hh)?;
    let t2 = e.sqr(&r)?;
    let t3 = e.sub(&t2, &hhh)?;
    let t4 = e.add(&v, &v)?;
    let x3 = e.sub(&t3, &t4)?;
    let t5 = e.sub(&v, &x3)?;
    let t6 = e.mul(&r, &t5)?;
    let t7 = e.mul(&s1, &hhh)?;
    let y3 = e.sub(&t6, &t7)?;
    let t8 = e.mul(z1, z2)?;
    let z3 = e.mul(&t8, &h)?;

    Ok(vec![vec![x3, y3, z3]])
}

fn dbl_1998_cmo_2(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, y1, z1) = (&p[0][0], &p[0][1], &p[0][2]);
    let a = e.param("a")?;

    let xx = e.sqr(x1)?;
    let yy = e.sqr(y1)?;
    let zz = e.sqr(z1)?;
    let t0 = e.mul(x1, &yy)?;
    let t1 = e.add(&t0, &t0)?;
    let s = e.add(&t1, &t1)?;
    let t2 = e.add(&xx, &xx)?;
    let t3 = e.add(&t2, &xx)?;
    let t4 = e.sqr(&zz)?;
    let t5 = e.mul(&a, &t4)?;
    let m = e.add(&t3, &t5)?;
    let t6 = e.sqr(&m)?;
    let t7 = e.add(&s, &s)?;
    let x3 = e.sub(&t6, &t7)?;
    let t8 = e.sub(&s, &x3)?;
    let t9 = e.mul(&m, &t8)?;
    let t10 = e.sqr(&yy)?;
    let t11 = e.add(&t10, &t10)?;
    let t12 = e.add(&t11, &t11)?;
    let t13 = e.add(&t12, &t12)?;
    let y3 = e.sub(&t9, &t13)?;
    let t14 = e.mul(y1, z1)?;
    let z3 = e.add(&t14, &t14)?;

    Ok(vec![vec![x3, y3, z3]])
}

fn z_jacobian(e: &mut Evaluator, p: &[Vec<Mod>]) -> Result<Vec<Vec<Mod>>, EcError> {
    let (x1, y1, z1) = (&p[0][0], &p[0][1], &p[0][2]);

    let a = e.inv(z1)?;
    let aa = e.sqr(&a)?;
    let x3 = e.mul(x1, &aa)?;
    let aaa = e.mul(&aa, &a)?;
    let y3 = e.mul(y1, &aaa)?;

    Ok(vec![vec![x3, y3, e.int(1)?]])
}
