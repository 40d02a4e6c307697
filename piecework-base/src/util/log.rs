/// Provides the recommended log filter for programs which want to exclude particularly noisy
/// details of structure assembly.
///
/// The guiding principle for this filtering is that at [`log::Level::Debug`] or lower level,
/// there should be no messages produced per octree node or per candidate unless something
/// is wrong.
#[allow(clippy::missing_inline_in_public_items)]
pub fn standard_filter(metadata: &log::Metadata<'_>) -> bool {
    let target = metadata.target();

    !((metadata.level() == log::Level::Trace && target.starts_with("piecework::space")) // per node
        || target.starts_with("clap_builder::")) // argument parsing internals
}
