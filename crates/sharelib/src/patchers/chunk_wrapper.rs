use sharelib_common::{DeferredModule, JsonpChunkPayload, SharedChunkGuard};

/// Makes the first deferred entry of a chunk wait for `guards` unless the registry
/// already has them.
///
/// A chunk without a deferred list gets one whose entry is the `null` sentinel, so
/// the runtime loads the shared chunks without running anything.
pub fn patch_chunk_payload(
  mut payload: JsonpChunkPayload,
  guards: Vec<SharedChunkGuard>,
) -> JsonpChunkPayload {
  if guards.is_empty() {
    return payload;
  }

  let deferred = payload.deferred_modules.get_or_insert_with(Vec::new);
  if deferred.is_empty() {
    deferred.push(DeferredModule::default());
  }
  deferred[0].shared_guards.extend(guards);
  payload
}
