//! I/O operations for reading and writing geospatial data

#[cfg(feature = "gdal")]
mod gdal_io;
mod metadata;
mod native;
mod vector;

#[cfg(feature = "gdal")]
pub use gdal_io::{read_geotiff, read_geotiff_metadata, write_geotiff, GeoTiffOptions};

#[cfg(not(feature = "gdal"))]
pub use native::{read_geotiff, read_geotiff_metadata, write_geotiff, GeoTiffOptions};

pub use metadata::{find as find_metadata, parse_gdal_xml, to_gdal_xml, MetadataItems};
pub use vector::read_shapefile;
