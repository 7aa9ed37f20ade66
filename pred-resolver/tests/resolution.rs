use pred_resolver::{
    CallParameter, CancellationToken, Error, Expression, InMemoryPredicateProvider, Predicate, PredicateParameter,
    PredicateProcessor, Solution, Value, ValueExpression, ValueType,
};
use std::cell::Cell;
use std::rc::Rc;

fn solve(provider: InMemoryPredicateProvider, name: &str, parameters: &[CallParameter]) -> Vec<Solution> {
    PredicateProcessor::new(provider)
        .process(name, parameters, &CancellationToken::new())
        .expect("valid query")
        .collect::<Result<_, _>>()
        .expect("no error")
}

/// `name(x)` with one clause per value, each binding `x` to it.
fn constants(name: &str, values: &[i64]) -> InMemoryPredicateProvider {
    values
        .iter()
        .map(|&value| {
            let x = PredicateParameter::new("x", ValueType::Int);
            Predicate::new(
                name,
                vec![x.clone()],
                vec![Expression::bind_or_check(&x, ValueExpression::constant(value)).expect("ok")],
            )
            .expect("ok")
        })
        .collect()
}

fn factorial() -> Vec<Predicate> {
    let parameters = || {
        vec![
            PredicateParameter::new("n", ValueType::Int),
            PredicateParameter::new("result", ValueType::Int),
        ]
    };

    let base = Predicate::with_factory("factorial", parameters(), |p| {
        Ok(vec![
            Expression::check(|context| Ok(context.get::<i64>("n")? <= 1)),
            Expression::bind_or_check(&p["result"], ValueExpression::constant(1))?,
        ])
    })
    .expect("ok");

    let step = Predicate::with_factory("factorial", parameters(), |p| {
        let m = CallParameter::named_output("m", ValueType::Int);
        let r = CallParameter::named_output("r", ValueType::Int);
        Ok(vec![
            Expression::check(|context| Ok(context.get::<i64>("n")? > 1)),
            Expression::bind_or_check(&m, ValueExpression::map_from(&p["n"], |n: i64| n - 1))?,
            Expression::call(
                "factorial",
                vec![ValueExpression::parameter(&m), ValueExpression::parameter(&r)],
            )?,
            Expression::bind_or_check(
                &p["result"],
                ValueExpression::map(ValueType::Int, |context| {
                    Ok(Value::Int(context.get::<i64>("n")? * context.get::<i64>("r")?))
                }),
            )?,
        ])
    })
    .expect("ok");

    vec![base, step]
}

#[test]
fn alternative_clauses_each_yield() {
    let x = CallParameter::named_output("x", ValueType::Int);
    let solutions = solve(constants("p", &[10, 20]), "p", &[x.clone()]);

    let values: Vec<i64> = solutions.iter().map(|s| s["x"].get().expect("int")).collect();
    assert_eq!(values, [10, 20]);
    assert_eq!(solutions[0].by_parameter(&x).map(|entry| entry.is_bound()), Some(true));
}

#[test]
fn unknown_predicate_has_no_solutions() {
    let x = CallParameter::named_output("x", ValueType::Int);
    assert!(solve(constants("p", &[10]), "q", &[x]).is_empty());
}

#[test]
fn arity_and_type_mismatches_are_skipped() {
    let provider = constants("p", &[10]);
    assert!(solve(provider.clone(), "p", &[]).is_empty());
    assert!(solve(provider.clone(), "p", &[CallParameter::literal("10")]).is_empty());
    assert!(solve(provider.clone(), "p", &[CallParameter::output(ValueType::Str)]).is_empty());
    assert_eq!(solve(provider, "p", &[CallParameter::output(ValueType::Any)]).len(), 1);
}

#[test]
fn input_is_checked_against_constant() {
    let x = PredicateParameter::new("x", ValueType::Any);
    let provider: InMemoryPredicateProvider = vec![Predicate::new(
        "is_ten",
        vec![x.clone()],
        vec![Expression::bind_or_check(&x, ValueExpression::constant(10)).expect("ok")],
    )
    .expect("ok")]
    .into_iter()
    .collect();

    assert!(solve(provider.clone(), "is_ten", &[CallParameter::literal("test")]).is_empty());
    assert!(solve(provider.clone(), "is_ten", &[CallParameter::literal(11)]).is_empty());

    let solutions = solve(provider, "is_ten", &[CallParameter::literal(10)]);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0][0].value(), Some(&Value::Int(10)));
}

#[test]
fn check_gates_evaluation() {
    let x = PredicateParameter::new("x", ValueType::Int);
    let clause = |pass: bool| {
        Predicate::new(
            "p",
            vec![x.clone()],
            vec![
                Expression::check(move |_| Ok(pass)),
                Expression::bind_or_check(&x, ValueExpression::constant(if pass { 1 } else { 2 })).expect("ok"),
            ],
        )
        .expect("ok")
    };
    let provider: InMemoryPredicateProvider = vec![clause(false), clause(true)].into_iter().collect();

    let solutions = solve(provider, "p", &[CallParameter::named_output("x", ValueType::Int)]);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0]["x"].get::<i64>(), Ok(1));
}

#[test]
fn unification_order_does_not_matter() {
    let p1 = PredicateParameter::new("p1", ValueType::Int);
    let p2 = PredicateParameter::new("p2", ValueType::Int);
    let link = Expression::bind_or_check(&p1, ValueExpression::parameter(&p2)).expect("ok");
    let ten = Expression::bind_or_check(&p1, ValueExpression::constant(10)).expect("ok");

    let provider: InMemoryPredicateProvider = vec![
        Predicate::new("link_first", vec![p1.clone(), p2.clone()], vec![link.clone(), ten.clone()]).expect("ok"),
        Predicate::new("link_last", vec![p1.clone(), p2.clone()], vec![ten, link]).expect("ok"),
    ]
    .into_iter()
    .collect();

    for name in ["link_first", "link_last"] {
        let a = CallParameter::named_output("a", ValueType::Int);
        let b = CallParameter::named_output("b", ValueType::Int);
        let solutions = solve(provider.clone(), name, &[a, b]);
        assert_eq!(solutions.len(), 1, "{}", name);
        assert_eq!(solutions[0]["a"].get::<i64>(), Ok(10), "{}", name);
        assert_eq!(solutions[0]["b"].get::<i64>(), Ok(10), "{}", name);
    }
}

#[test]
fn unbound_aliases_are_reported() {
    let p1 = PredicateParameter::new("p1", ValueType::Int);
    let p2 = PredicateParameter::new("p2", ValueType::Int);
    let provider: InMemoryPredicateProvider = vec![Predicate::new(
        "same",
        vec![p1.clone(), p2.clone()],
        vec![Expression::bind_or_check(&p1, ValueExpression::parameter(&p2)).expect("ok")],
    )
    .expect("ok")]
    .into_iter()
    .collect();

    let a = CallParameter::named_output("a", ValueType::Int);
    let b = CallParameter::named_output("b", ValueType::Int);
    let solutions = solve(provider.clone(), "same", &[a.clone(), b.clone()]);
    assert_eq!(solutions.len(), 1);
    assert!(!solutions[0]["a"].is_bound());
    assert_eq!(solutions[0]["a"].aliases().collect::<Vec<_>>(), [&b]);
    assert_eq!(solutions[0]["b"].aliases().collect::<Vec<_>>(), [&a]);

    // Bound inputs only unify when equal.
    assert_eq!(
        solve(provider.clone(), "same", &[CallParameter::literal(1), CallParameter::literal(1)]).len(),
        1
    );
    assert!(solve(provider, "same", &[CallParameter::literal(1), CallParameter::literal(2)]).is_empty());
}

#[test]
fn repeated_output_is_one_variable() {
    let p1 = PredicateParameter::new("p1", ValueType::Int);
    let p2 = PredicateParameter::new("p2", ValueType::Int);
    let clause = |second: i64| {
        Predicate::new(
            "pair",
            vec![p1.clone(), p2.clone()],
            vec![
                Expression::bind_or_check(&p1, ValueExpression::constant(5)).expect("ok"),
                Expression::bind_or_check(&p2, ValueExpression::constant(second)).expect("ok"),
            ],
        )
        .expect("ok")
    };
    let provider: InMemoryPredicateProvider = vec![clause(5), clause(6)].into_iter().collect();

    let x = CallParameter::named_output("x", ValueType::Int);
    let solutions = solve(provider, "pair", &[x.clone(), x]);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0]["x"].get::<i64>(), Ok(5));
    assert_eq!(solutions[0][1].get::<i64>(), Ok(5));
}

#[test]
fn factorial_recursion() {
    let provider: InMemoryPredicateProvider = factorial().into_iter().collect();

    for (n, expected) in [(1, 1), (2, 2), (3, 6), (4, 24)] {
        let result = CallParameter::named_output("result", ValueType::Int);
        let solutions = solve(provider.clone(), "factorial", &[CallParameter::literal(n), result]);
        assert_eq!(solutions.len(), 1, "factorial({})", n);
        assert_eq!(solutions[0]["result"].get::<i64>(), Ok(expected), "factorial({})", n);
    }
}

#[test]
fn factorial_checks_bound_result() {
    let provider: InMemoryPredicateProvider = factorial().into_iter().collect();

    assert_eq!(
        solve(provider.clone(), "factorial", &[CallParameter::literal(4), CallParameter::literal(24)]).len(),
        1
    );
    assert!(solve(provider, "factorial", &[CallParameter::literal(4), CallParameter::literal(25)]).is_empty());
}

#[test]
fn call_with_constant_argument() {
    let x = PredicateParameter::new("x", ValueType::Int);
    let y = PredicateParameter::new("y", ValueType::Int);
    let double = Predicate::new(
        "double",
        vec![x.clone(), y.clone()],
        vec![Expression::bind_or_check(&y, ValueExpression::map_from(&x, |x: i64| 2 * x)).expect("ok")],
    )
    .expect("ok");

    let out = PredicateParameter::new("out", ValueType::Int);
    let answer = Predicate::new(
        "answer",
        vec![out.clone()],
        vec![Expression::call(
            "double",
            vec![ValueExpression::constant(21), ValueExpression::parameter(&out)],
        )
        .expect("ok")],
    )
    .expect("ok");

    let provider: InMemoryPredicateProvider = vec![double, answer].into_iter().collect();
    let solutions = solve(provider, "answer", &[CallParameter::named_output("out", ValueType::Int)]);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0]["out"].get::<i64>(), Ok(42));
}

#[test]
fn call_results_multiply() {
    let x = PredicateParameter::new("x", ValueType::Int);
    let y = PredicateParameter::new("y", ValueType::Int);
    let pairs = Predicate::new(
        "pairs",
        vec![x.clone(), y.clone()],
        vec![
            Expression::call("digit", vec![ValueExpression::parameter(&x)]).expect("ok"),
            Expression::call("digit", vec![ValueExpression::parameter(&y)]).expect("ok"),
        ],
    )
    .expect("ok");

    let mut provider = constants("digit", &[1, 2, 3]);
    provider.add(pairs);

    let solutions = solve(
        provider,
        "pairs",
        &[
            CallParameter::named_output("x", ValueType::Int),
            CallParameter::named_output("y", ValueType::Int),
        ],
    );
    let found: Vec<(i64, i64)> = solutions
        .iter()
        .map(|s| (s["x"].get().expect("int"), s["y"].get().expect("int")))
        .collect();
    assert_eq!(
        found,
        [(1, 1), (1, 2), (1, 3), (2, 1), (2, 2), (2, 3), (3, 1), (3, 2), (3, 3)]
    );
}

#[test]
fn search_is_breadth_first() {
    let x = PredicateParameter::new("x", ValueType::Int);
    let deferred = Predicate::new(
        "p",
        vec![x.clone()],
        vec![Expression::call("q", vec![ValueExpression::parameter(&x)]).expect("ok")],
    )
    .expect("ok");
    let immediate = Predicate::new(
        "p",
        vec![x.clone()],
        vec![Expression::bind_or_check(&x, ValueExpression::constant(1)).expect("ok")],
    )
    .expect("ok");

    let mut provider = constants("q", &[2]);
    provider.extend(vec![deferred, immediate]);

    let solutions = solve(provider, "p", &[CallParameter::named_output("x", ValueType::Int)]);
    let values: Vec<i64> = solutions.iter().map(|s| s["x"].get().expect("int")).collect();
    assert_eq!(values, [1, 2]);
}

#[test]
fn unknown_callee_fails_branch_only() {
    let x = PredicateParameter::new("x", ValueType::Int);
    let mut provider = constants("p", &[3]);
    provider.add(
        Predicate::new(
            "p",
            vec![x.clone()],
            vec![Expression::call("missing", vec![ValueExpression::parameter(&x)]).expect("ok")],
        )
        .expect("ok"),
    );

    let solutions = solve(provider, "p", &[CallParameter::named_output("x", ValueType::Int)]);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0]["x"].get::<i64>(), Ok(3));
}

#[test]
fn callee_locals_do_not_leak() {
    // `inner` binds its own local named "r" before binding its output;
    // the caller's local of the same name must be unaffected.
    let out = PredicateParameter::new("out", ValueType::Int);
    let inner = Predicate::with_factory("inner", vec![out.clone()], |p| {
        let r = CallParameter::named_output("r", ValueType::Int);
        Ok(vec![
            Expression::bind_or_check(&r, ValueExpression::constant(100))?,
            Expression::bind_or_check(&p["out"], ValueExpression::constant(1))?,
        ])
    })
    .expect("ok");

    let outer = Predicate::with_factory("outer", vec![out.clone()], |p| {
        let r = CallParameter::named_output("r", ValueType::Int);
        Ok(vec![
            Expression::call("inner", vec![ValueExpression::parameter(&r)])?,
            Expression::check(|context| Ok(context.get::<i64>("r")? == 1)),
            Expression::bind_or_check(&p["out"], ValueExpression::parameter(&r))?,
        ])
    })
    .expect("ok");

    let provider: InMemoryPredicateProvider = vec![inner, outer].into_iter().collect();
    let solutions = solve(provider, "outer", &[CallParameter::named_output("out", ValueType::Int)]);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0]["out"].get::<i64>(), Ok(1));
}

#[test]
fn actions_run_once_per_branch() {
    let runs = Rc::new(Cell::new(0));
    let x = PredicateParameter::new("x", ValueType::Int);
    let counter = runs.clone();
    let noisy = Predicate::new(
        "noisy",
        vec![x.clone()],
        vec![
            Expression::call("digit", vec![ValueExpression::parameter(&x)]).expect("ok"),
            Expression::action(move |context| {
                context.get::<i64>("x")?;
                counter.set(counter.get() + 1);
                Ok(())
            }),
        ],
    )
    .expect("ok");

    let mut provider = constants("digit", &[1, 2, 3]);
    provider.add(noisy);
    assert_eq!(solve(provider, "noisy", &[CallParameter::output(ValueType::Int)]).len(), 3);
    assert_eq!(runs.get(), 3);
}

#[test]
fn unbound_reference_aborts_enumeration() {
    let x = PredicateParameter::new("x", ValueType::Int);
    let local = CallParameter::named_output("local", ValueType::Int);
    let mut provider = constants("p", &[1]);
    provider.add(
        Predicate::new(
            "p",
            vec![x.clone()],
            vec![Expression::bind_or_check(&x, ValueExpression::parameter(&local)).expect("ok")],
        )
        .expect("ok"),
    );
    provider.add(
        Predicate::new(
            "p",
            vec![x.clone()],
            vec![Expression::bind_or_check(&x, ValueExpression::map_from(&local, |v: i64| v)).expect("ok")],
        )
        .expect("ok"),
    );

    let processor = PredicateProcessor::new(provider);
    let mut solutions = processor
        .process("p", &[CallParameter::output(ValueType::Int)], &CancellationToken::new())
        .expect("ok");

    // Unifying with a fresh local is fine; reading it is not.
    assert!(matches!(solutions.next(), Some(Ok(_))));
    assert!(matches!(solutions.next(), Some(Ok(_))));
    assert_eq!(
        solutions.next().map(|r| r.map(|_| ())),
        Some(Err(Error::Unbound("local".into())))
    );
    assert!(solutions.next().is_none());
}

#[test]
fn cancellation_stops_enumeration() {
    let token = CancellationToken::new();
    let processor = PredicateProcessor::new(constants("p", &[1, 2, 3]));
    let mut solutions = processor
        .process("p", &[CallParameter::output(ValueType::Int)], &token)
        .expect("ok");

    assert!(matches!(solutions.next(), Some(Ok(_))));
    token.cancel();
    assert_eq!(solutions.next().map(|r| r.map(|_| ())), Some(Err(Error::Cancelled)));
    assert!(solutions.next().is_none());

    // A token cancelled up front yields nothing but the error.
    let mut solutions = processor
        .process("p", &[CallParameter::output(ValueType::Int)], &token)
        .expect("ok");
    assert_eq!(solutions.next().map(|r| r.map(|_| ())), Some(Err(Error::Cancelled)));
    assert!(solutions.next().is_none());
}

#[test]
fn declared_type_is_enforced_through_any_output() {
    let x = PredicateParameter::new("x", ValueType::Int);
    let y = PredicateParameter::new("y", ValueType::Any);
    let provider: InMemoryPredicateProvider = vec![
        Predicate::new(
            "narrow",
            vec![x.clone(), y.clone()],
            vec![
                Expression::bind_or_check(&y, ValueExpression::constant("text")).expect("ok"),
                Expression::bind_or_check(&y, ValueExpression::parameter(&x)).expect("ok"),
            ],
        )
        .expect("ok"),
    ]
    .into_iter()
    .collect();

    let processor = PredicateProcessor::new(provider);
    let any = [CallParameter::output(ValueType::Any), CallParameter::output(ValueType::Any)];
    let results: Vec<_> = processor
        .process("narrow", &any, &CancellationToken::new())
        .expect("ok")
        .collect();
    assert_eq!(results.len(), 1);
    assert!(matches!(results[0], Err(Error::TypeMismatch { .. })));
}

#[test]
fn body_may_reference_query_parameter() {
    let parameter = PredicateParameter::new("parameter", ValueType::Int);
    let out = CallParameter::named_output("out", ValueType::Int);
    let clause = |second: i64| {
        Predicate::new(
            "top",
            vec![parameter.clone()],
            vec![
                Expression::bind_or_check(&parameter, ValueExpression::constant(20)).expect("ok"),
                Expression::bind_or_check(&out, ValueExpression::constant(second)).expect("ok"),
            ],
        )
        .expect("ok")
    };
    let provider: InMemoryPredicateProvider = vec![clause(99), clause(20)].into_iter().collect();

    let solutions = solve(provider, "top", &[out.clone()]);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0]["out"].get::<i64>(), Ok(20));
}

#[test]
fn callee_reads_caller_variables() {
    let runs = Rc::new(Cell::new(0));
    let parameter1 = PredicateParameter::new("parameter1", ValueType::Int);
    let variable = CallParameter::named_output("variable", ValueType::Int);

    let outer = {
        let variable = variable.clone();
        let counter = runs.clone();
        Predicate::with_factory("outer", vec![parameter1.clone()], move |p| {
            let counter = counter.clone();
            Ok(vec![
                Expression::bind_or_check(&variable, ValueExpression::constant(10))?,
                Expression::call("inner", vec![ValueExpression::parameter(&p["parameter1"])])?,
                Expression::action(move |context| {
                    counter.set(counter.get() + 1);
                    assert_eq!(context.get::<i64>("parameter1"), Ok(20));
                    assert_eq!(context.get::<i64>("output"), Ok(20));
                    assert_eq!(context.get::<i64>("variable"), Ok(10));
                    assert_eq!(
                        context.get::<i64>("innerVariable"),
                        Err(Error::UnknownParameter("innerVariable".into()))
                    );
                    Ok(())
                }),
            ])
        })
        .expect("ok")
    };

    let inner = {
        let variable = variable.clone();
        let parameter1 = parameter1.clone();
        let counter = runs.clone();
        Predicate::with_factory(
            "inner",
            vec![PredicateParameter::new("parameter2", ValueType::Int)],
            move |p| {
                let inner_variable = CallParameter::named_output("innerVariable", ValueType::Int);
                let (variable, parameter1, counter) = (variable.clone(), parameter1.clone(), counter.clone());
                let seen = inner_variable.clone();
                Ok(vec![
                    Expression::bind_or_check(&p["parameter2"], ValueExpression::constant(20))?,
                    Expression::bind_or_check(&inner_variable, ValueExpression::constant(30))?,
                    Expression::action(move |context| {
                        counter.set(counter.get() + 1);
                        assert_eq!(context.get::<i64>("parameter2"), Ok(20));
                        assert_eq!(context.get::<i64>("output"), Ok(20));
                        assert_eq!(context.get::<i64>("innerVariable"), Ok(30));

                        let binding = context.binding_of(&seen)?;
                        assert_eq!(binding.parameter_type(), ValueType::Int);
                        assert_eq!(binding.aliases().collect::<Vec<_>>(), [&seen]);

                        assert_eq!(
                            context.get::<i64>("variable"),
                            Err(Error::UnknownParameter("variable".into()))
                        );
                        assert!(context.binding_of(&variable).is_err());
                        assert!(context.binding_of(&parameter1).is_err());
                        Ok(())
                    }),
                ])
            },
        )
        .expect("ok")
    };

    let provider: InMemoryPredicateProvider = vec![outer, inner].into_iter().collect();
    let solutions = solve(provider, "outer", &[CallParameter::named_output("output", ValueType::Int)]);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0]["output"].get::<i64>(), Ok(20));
    assert_eq!(runs.get(), 2);
}

/// `outer(parameter)` passes one local twice to `pair`, binding it to
/// `parameter` before or after the call.
fn same_output_twice(bind_first: bool) -> InMemoryPredicateProvider {
    let outer = Predicate::with_factory(
        "outer",
        vec![PredicateParameter::new("parameter", ValueType::Int)],
        move |p| {
            let local = CallParameter::named_output("local", ValueType::Int);
            let bind = Expression::bind_or_check(&p["parameter"], ValueExpression::parameter(&local))?;
            let call = Expression::call(
                "pair",
                vec![ValueExpression::parameter(&local), ValueExpression::parameter(&local)],
            )?;
            Ok(if bind_first { vec![bind, call] } else { vec![call, bind] })
        },
    )
    .expect("ok");

    let pair = |value: i64| {
        Predicate::with_factory(
            "pair",
            vec![
                PredicateParameter::new("parameter1", ValueType::Int),
                PredicateParameter::new("parameter2", ValueType::Int),
            ],
            move |p| {
                Ok(vec![
                    Expression::bind_or_check(&p["parameter1"], ValueExpression::parameter(&p["parameter2"]))?,
                    Expression::bind_or_check(&p["parameter1"], ValueExpression::constant(value))?,
                ])
            },
        )
        .expect("ok")
    };

    vec![outer, pair(10), pair(20)].into_iter().collect()
}

#[test]
fn same_local_passed_twice_to_call() {
    for bind_first in [false, true] {
        let output = CallParameter::named_output("output", ValueType::Int);
        let solutions = solve(same_output_twice(bind_first), "outer", &[output]);

        let values: Vec<i64> = solutions.iter().map(|s| s["output"].get().expect("int")).collect();
        assert_eq!(values, [10, 20], "bind first: {}", bind_first);
        for solution in &solutions {
            assert_eq!(solution.len(), 1);
            assert_eq!(solution[0].parameter_type(), ValueType::Int);
            assert!(solution["output"].is_bound());
            assert_eq!(solution[0].aliases().count(), 0);
        }
    }
}

#[test]
fn callee_type_does_not_outlive_call() {
    let x = PredicateParameter::new("x", ValueType::Any);
    let outer = Predicate::new(
        "outer",
        vec![x.clone()],
        vec![
            Expression::call("inner", vec![ValueExpression::parameter(&x)]).expect("ok"),
            Expression::bind_or_check(&x, ValueExpression::constant("s")).expect("ok"),
        ],
    )
    .expect("ok");

    let inner = Predicate::with_factory(
        "inner",
        vec![PredicateParameter::new("p", ValueType::Int)],
        |p| {
            let local = CallParameter::output(ValueType::Int);
            Ok(vec![Expression::bind_or_check(&p["p"], ValueExpression::parameter(&local))?])
        },
    )
    .expect("ok");

    let provider: InMemoryPredicateProvider = vec![outer, inner].into_iter().collect();
    let solutions = solve(provider, "outer", &[CallParameter::named_output("x", ValueType::Any)]);
    assert_eq!(solutions.len(), 1);
    assert_eq!(solutions[0]["x"].value(), Some(&Value::from("s")));
    assert_eq!(solutions[0]["x"].parameter_type(), ValueType::Any);
}
