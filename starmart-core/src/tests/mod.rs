mod star_schema;
