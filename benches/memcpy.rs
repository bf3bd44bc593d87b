use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use std::time::Duration;
use tagcopy::tag::{CrossTags, UntaggedPlatform};
use tagcopy::{Tag, WORD_SIZE, Word, memcpy_no_tags, tagged_memcpy};

#[derive(Clone)]
struct CopyCase {
    label: String,
    len: usize,
    src_off: usize,
    dst_off: usize,
}

fn configure_group_for_len(
    group: &mut criterion::BenchmarkGroup<'_, criterion::measurement::WallTime>,
    len: usize,
) {
    if len >= 1 << 20 {
        group.sample_size(20);
        group.warm_up_time(Duration::from_millis(300));
        group.measurement_time(Duration::from_millis(900));
    } else if len >= 1 << 16 {
        group.sample_size(30);
        group.warm_up_time(Duration::from_millis(250));
        group.measurement_time(Duration::from_millis(700));
    } else {
        group.sample_size(40);
        group.warm_up_time(Duration::from_millis(200));
        group.measurement_time(Duration::from_millis(500));
    }
}

fn memcpy_benches(c: &mut Criterion) {
    let mut cases = Vec::new();

    // Sizes around the unroll group boundaries plus a few bulk sizes.
    let sizes = [
        1usize, 7, 8, 16, 31, 32, 64, 72, 128, 256, 257, 1024, 4096, 65536, 1 << 20,
    ];

    for len in sizes {
        cases.push(CopyCase {
            label: format!("size_{len}"),
            len,
            src_off: 0,
            dst_off: 0,
        });
    }

    // Co-aligned but misaligned (untagged word path) and mutually misaligned
    // (byte path).
    for len in [64usize, 256, 4096] {
        for (src_off, dst_off) in [(1usize, 1usize), (3, 5)] {
            cases.push(CopyCase {
                label: format!("align_len{len}_s{src_off}_d{dst_off}"),
                len,
                src_off,
                dst_off,
            });
        }
    }

    let mut group = c.benchmark_group("memcpy");

    for case in &cases {
        let len = case.len;
        let cells = len.div_ceil(WORD_SIZE) + 2;
        let mut src = vec![0 as Word; cells];
        let mut dst = vec![0 as Word; cells];
        for (i, cell) in src.iter_mut().enumerate() {
            *cell = i as Word;
        }
        let mut dst_tags = vec![Tag::NONE; cells];
        let src_tags: Vec<Tag> = (0..cells)
            .map(|i| Tag::from_bits_truncate(i as u8))
            .collect();

        let src_ptr = unsafe { src.as_ptr().cast::<u8>().add(case.src_off) };
        let dst_ptr = unsafe { dst.as_mut_ptr().cast::<u8>().add(case.dst_off) };
        let dst_base = dst.as_ptr();
        let src_base = src.as_ptr();

        configure_group_for_len(&mut group, len);
        group.throughput(Throughput::Bytes(len as u64));

        group.bench_with_input(BenchmarkId::new("ptr_copy", &case.label), &len, |b, &n| {
            b.iter(|| unsafe {
                core::ptr::copy_nonoverlapping(black_box(src_ptr), black_box(dst_ptr), black_box(n));
                black_box(core::ptr::read_volatile(dst_ptr));
            });
        });

        group.bench_with_input(BenchmarkId::new("no_tags", &case.label), &len, |b, &n| {
            b.iter(|| unsafe {
                memcpy_no_tags(black_box(dst_ptr), black_box(src_ptr), black_box(n));
                black_box(core::ptr::read_volatile(dst_ptr));
            });
        });

        group.bench_with_input(
            BenchmarkId::new("tagged_untagged_platform", &case.label),
            &len,
            |b, &n| {
                let mut port = UntaggedPlatform;
                b.iter(|| unsafe {
                    tagged_memcpy(&mut port, black_box(dst_ptr), black_box(src_ptr), black_box(n));
                    black_box(core::ptr::read_volatile(dst_ptr));
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("tagged_slice", &case.label),
            &len,
            |b, &n| {
                let mut port = CrossTags::new(src_base, &src_tags, dst_base, &mut dst_tags);
                b.iter(|| unsafe {
                    tagged_memcpy(&mut port, black_box(dst_ptr), black_box(src_ptr), black_box(n));
                    black_box(core::ptr::read_volatile(dst_ptr));
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, memcpy_benches);
criterion_main!(benches);
