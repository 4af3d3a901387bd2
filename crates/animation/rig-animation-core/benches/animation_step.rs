use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use rig_animation_core::{
    Animation, AnimationState, AnimationStateData, Config, Skeleton, SkeletonData,
};

fn load_fixture(name: &str) -> Animation {
    rig_test_fixtures::animations::load(name).expect("load animation fixture")
}

fn biped() -> Skeleton {
    let data: SkeletonData = rig_test_fixtures::skeletons::load("biped").expect("load biped");
    Skeleton::new(data)
}

fn bench_apply(c: &mut Criterion) {
    let walk = load_fixture("walk");
    let mut skeleton = biped();
    let dt = 1.0 / 60.0;

    c.bench_function("walk_apply_60fps", |b| {
        let mut time = 0.0f32;
        b.iter(|| {
            time += dt;
            walk.apply(&mut skeleton, black_box(time), true);
        });
    });

    let blink = load_fixture("blink");
    c.bench_function("walk_apply_blink_mix_half", |b| {
        let mut time = 0.0f32;
        b.iter(|| {
            time += dt;
            walk.apply(&mut skeleton, black_box(time), true);
            blink.mix(&mut skeleton, black_box(time), true, 0.5);
        });
    });
}

fn bench_state(c: &mut Criterion) {
    let mut data = AnimationStateData::new(Config {
        default_mix: 0.2,
        ..Config::default()
    });
    data.add_animation(load_fixture("wave")).expect("register wave");
    data.add_animation(load_fixture("walk")).expect("register walk");
    let mut state = AnimationState::new(Arc::new(data));
    let mut skeleton = biped();
    let dt = 1.0 / 60.0;

    c.bench_function("state_crossfade_cycle", |b| {
        let mut frame = 0u32;
        b.iter(|| {
            // Switch every half second so a crossfade is usually in flight.
            if frame % 30 == 0 {
                let next = if (frame / 30) % 2 == 0 { "walk" } else { "wave" };
                state
                    .set_animation_by_name(next, true)
                    .expect("registered animation");
            }
            frame = frame.wrapping_add(1);
            state.update(dt);
            state.apply(&mut skeleton);
        });
    });
}

criterion_group!(benches, bench_apply, bench_state);
criterion_main!(benches);
